//! Domain error types.

use event_store::EventStoreError;
use thiserror::Error;

use crate::contact::ValidationErrors;
use crate::order::OrderError;
use crate::quotation::QuotationError;

/// Errors returned by the domain services.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    #[error("Quotation error: {0}")]
    Quotation(QuotationError),

    #[error("Order error: {0}")]
    Order(OrderError),

    /// Customer input failed field-level validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// True when the target aggregate does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::Quotation(QuotationError::NotFound) | DomainError::Order(OrderError::NotFound)
        )
    }

    /// True for a rejected state-machine transition.
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            DomainError::Quotation(QuotationError::InvalidStateTransition { .. })
                | DomainError::Order(OrderError::InvalidStateTransition { .. })
                | DomainError::Order(OrderError::InvalidPaymentTransition { .. })
        )
    }
}
