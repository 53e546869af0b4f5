//! Saga orchestration for converting approved quotations into orders.
//!
//! The conversion saga runs two steps:
//! 1. Place an order linked to the quotation
//! 2. Mark the quotation converted
//!
//! If the second step fails, the order placed in the first is cancelled.

pub mod aggregate;
pub mod conversion;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod state;

pub use aggregate::SagaInstance;
pub use conversion::{ConversionRequest, Converted, LinePrice};
pub use coordinator::ConversionCoordinator;
pub use error::SagaError;
pub use events::SagaEvent;
pub use state::SagaState;
