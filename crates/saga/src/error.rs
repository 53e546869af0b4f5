//! Saga error types.

use common::AggregateId;
use domain::{DomainError, Money, QuotationStatus};
use event_store::EventStoreError;
use thiserror::Error;

/// Errors that can occur while converting a quotation into an order.
#[derive(Debug, Error)]
pub enum SagaError {
    #[error("Quotation not found: {0}")]
    QuotationNotFound(AggregateId),

    /// Only approved quotations can be converted.
    #[error("Quotation is {0}, expected approved")]
    QuotationNotApproved(QuotationStatus),

    /// A line had no price on the quotation and none was supplied.
    #[error("No unit price for line {index} ({product})")]
    MissingPrice { index: usize, product: String },

    #[error("A price was supplied for a product that is not on the quotation")]
    UnknownLine,

    /// Staff-supplied line prices must add up to the approved total.
    #[error("Line totals {lines} do not match the approved total {approved}")]
    TotalMismatch { lines: Money, approved: Money },

    /// A step failed after earlier steps had already been undone.
    #[error("Conversion step '{step}' failed and was compensated: {reason}")]
    Compensated {
        saga_id: AggregateId,
        step: &'static str,
        reason: String,
    },

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
