//! Quotation aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod line_item;
mod service;
mod state;

pub use aggregate::Quotation;
pub use commands::*;
pub use events::{
    QuotationApprovedData, QuotationConvertedData, QuotationEvent, QuotationRejectedData,
    QuotationRequestedData,
};
pub use line_item::{
    LineItem, MAX_LINE_QUANTITY, NewLineItem, estimated_total, validate_lines,
};
pub use service::QuotationService;
pub use state::QuotationStatus;

use thiserror::Error;

use crate::money::Money;

/// Errors raised by quotation commands.
#[derive(Debug, Error)]
pub enum QuotationError {
    #[error("Quotation not found")]
    NotFound,

    #[error("Quotation already exists")]
    AlreadyRequested,

    #[error("Invalid state transition: cannot {action} a quotation that is {current_state}")]
    InvalidStateTransition {
        current_state: QuotationStatus,
        action: &'static str,
    },

    #[error("Approved total must be greater than zero, got {0}")]
    InvalidApprovedTotal(Money),
}
