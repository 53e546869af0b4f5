//! Order aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod line;
mod service;
mod state;

pub use aggregate::Order;
pub use commands::*;
pub use events::{
    OrderCancelledData, OrderDeliveredData, OrderDispatchedData, OrderEvent, OrderPlacedData,
    PaymentRecordedData, PaymentRefundedData, QuotationLink,
};
pub use line::OrderLine;
pub use service::OrderService;
pub use state::{FulfillmentStatus, PaymentStatus};

use thiserror::Error;

use crate::money::Money;

/// Errors raised by order commands.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found")]
    NotFound,

    #[error("Order already exists")]
    AlreadyPlaced,

    #[error("Invalid state transition: cannot {action} an order that is {current_state}")]
    InvalidStateTransition {
        current_state: FulfillmentStatus,
        action: &'static str,
    },

    #[error("Invalid payment transition: cannot {action} when payment is {current_state}")]
    InvalidPaymentTransition {
        current_state: PaymentStatus,
        action: &'static str,
    },

    #[error("Shipping address is required")]
    MissingAddress,

    #[error("Order must have at least one line")]
    NoLines,

    #[error("Line {index} quantity must be at least 1")]
    InvalidQuantity { index: usize },

    #[error("Line {index} total {actual} does not equal unit price times quantity ({expected})")]
    LineTotalMismatch {
        index: usize,
        expected: Money,
        actual: Money,
    },

    #[error("Sum of line totals {lines} does not equal order total {total}")]
    TotalMismatch { lines: Money, total: Money },

    #[error("Final amount {final_amount} does not equal total {total} plus GST {gst}")]
    FinalAmountMismatch {
        total: Money,
        gst: Money,
        final_amount: Money,
    },

    #[error("Amounts cannot be negative")]
    NegativeAmount,

    #[error("Order amount is too large")]
    AmountOverflow,
}
