//! Quotation domain events.

use chrono::{DateTime, Utc};
use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;
use crate::contact::CustomerContact;
use crate::money::Money;
use crate::numbering::DocumentNumber;

use super::LineItem;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum QuotationEvent {
    /// Header and every line, written as one event so a quotation never
    /// exists without its items.
    QuotationRequested(QuotationRequestedData),

    QuotationApproved(QuotationApprovedData),

    QuotationRejected(QuotationRejectedData),

    /// An order was placed from this quotation.
    QuotationConverted(QuotationConvertedData),
}

impl DomainEvent for QuotationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            QuotationEvent::QuotationRequested(_) => "QuotationRequested",
            QuotationEvent::QuotationApproved(_) => "QuotationApproved",
            QuotationEvent::QuotationRejected(_) => "QuotationRejected",
            QuotationEvent::QuotationConverted(_) => "QuotationConverted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationRequestedData {
    pub quotation_id: AggregateId,
    pub number: DocumentNumber,
    pub contact: CustomerContact,
    pub items: Vec<LineItem>,
    /// Sum of line quantities.
    pub total_items: u32,
    pub estimated_total: Option<Money>,
    pub customer_notes: Option<String>,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationApprovedData {
    pub approved_total: Money,
    pub admin_notes: Option<String>,
    pub approved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationRejectedData {
    pub admin_notes: Option<String>,
    pub rejected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationConvertedData {
    pub order_id: AggregateId,
    pub order_number: DocumentNumber,
    pub converted_at: DateTime<Utc>,
}

impl QuotationEvent {
    pub fn approved(approved_total: Money, admin_notes: Option<String>) -> Self {
        QuotationEvent::QuotationApproved(QuotationApprovedData {
            approved_total,
            admin_notes,
            approved_at: Utc::now(),
        })
    }

    pub fn rejected(admin_notes: Option<String>) -> Self {
        QuotationEvent::QuotationRejected(QuotationRejectedData {
            admin_notes,
            rejected_at: Utc::now(),
        })
    }

    pub fn converted(order_id: AggregateId, order_number: DocumentNumber) -> Self {
        QuotationEvent::QuotationConverted(QuotationConvertedData {
            order_id,
            order_number,
            converted_at: Utc::now(),
        })
    }
}
