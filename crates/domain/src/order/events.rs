//! Order domain events.

use chrono::{DateTime, Utc};
use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;
use crate::contact::CustomerContact;
use crate::money::Money;
use crate::numbering::DocumentNumber;

use super::OrderLine;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    /// Header, lines and amounts in one event.
    OrderPlaced(OrderPlacedData),

    OrderDispatched(OrderDispatchedData),

    OrderDelivered(OrderDeliveredData),

    OrderCancelled(OrderCancelledData),

    PaymentRecorded(PaymentRecordedData),

    PaymentRefunded(PaymentRefundedData),
}

impl DomainEvent for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "OrderPlaced",
            OrderEvent::OrderDispatched(_) => "OrderDispatched",
            OrderEvent::OrderDelivered(_) => "OrderDelivered",
            OrderEvent::OrderCancelled(_) => "OrderCancelled",
            OrderEvent::PaymentRecorded(_) => "PaymentRecorded",
            OrderEvent::PaymentRefunded(_) => "PaymentRefunded",
        }
    }
}

/// The quotation an order was converted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationLink {
    pub quotation_id: AggregateId,
    pub quotation_number: DocumentNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlacedData {
    pub order_id: AggregateId,
    pub number: DocumentNumber,
    pub contact: CustomerContact,
    pub lines: Vec<OrderLine>,
    pub total_amount: Money,
    pub gst_amount: Money,
    pub final_amount: Money,
    pub quotation: Option<QuotationLink>,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub placed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDispatchedData {
    pub tracking_number: Option<String>,
    /// Set when the order left before payment was recorded.
    pub payment_pending: bool,
    pub dispatched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDeliveredData {
    pub delivered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancelledData {
    pub reason: String,
    pub cancelled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecordedData {
    pub reference: Option<String>,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRefundedData {
    pub reason: Option<String>,
    pub refunded_at: DateTime<Utc>,
}

impl OrderEvent {
    pub fn dispatched(tracking_number: Option<String>, payment_pending: bool) -> Self {
        OrderEvent::OrderDispatched(OrderDispatchedData {
            tracking_number,
            payment_pending,
            dispatched_at: Utc::now(),
        })
    }

    pub fn delivered() -> Self {
        OrderEvent::OrderDelivered(OrderDeliveredData {
            delivered_at: Utc::now(),
        })
    }

    pub fn cancelled(reason: impl Into<String>) -> Self {
        OrderEvent::OrderCancelled(OrderCancelledData {
            reason: reason.into(),
            cancelled_at: Utc::now(),
        })
    }

    pub fn payment_recorded(reference: Option<String>) -> Self {
        OrderEvent::PaymentRecorded(PaymentRecordedData {
            reference,
            paid_at: Utc::now(),
        })
    }

    pub fn payment_refunded(reason: Option<String>) -> Self {
        OrderEvent::PaymentRefunded(PaymentRefundedData {
            reason,
            refunded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatched_event_carries_payment_flag() {
        let event = OrderEvent::dispatched(Some("DTDC123".to_string()), true);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "OrderDispatched");
        assert_eq!(json["data"]["payment_pending"], true);
        assert_eq!(json["data"]["tracking_number"], "DTDC123");

        let back: OrderEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.event_type(), "OrderDispatched");
    }
}
