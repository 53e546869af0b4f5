//! HTTP handlers, one module per resource.

pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod quotations;
pub mod sagas;
pub mod tracking;

use common::AggregateId;
use domain::StatusBadge;
use projections::{OrderSummary, QuotationSummary};
use serde::Serialize;

use crate::error::ApiError;

/// Parses a path ID, answering 400 on garbage.
pub(crate) fn parse_aggregate_id(id: &str) -> Result<AggregateId, ApiError> {
    AggregateId::parse(id).map_err(|e| ApiError::BadRequest(format!("Invalid ID {id}: {e}")))
}

/// A quotation with its status badge.
#[derive(Serialize)]
pub struct QuotationResponse {
    #[serde(flatten)]
    pub quotation: QuotationSummary,
    pub badge: StatusBadge,
}

impl From<QuotationSummary> for QuotationResponse {
    fn from(quotation: QuotationSummary) -> Self {
        Self {
            badge: quotation.status.badge(),
            quotation,
        }
    }
}

/// An order with badges for both status axes.
#[derive(Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: OrderSummary,
    pub badge: StatusBadge,
    pub payment_badge: StatusBadge,
}

impl From<OrderSummary> for OrderResponse {
    fn from(order: OrderSummary) -> Self {
        Self {
            badge: order.status.badge(),
            payment_badge: order.payment_status.badge(),
            order,
        }
    }
}
