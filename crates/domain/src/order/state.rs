//! Order fulfillment and payment state machines.
//!
//! The two axes move independently: an order can be dispatched before it is
//! paid, and a delivered order can still be refunded.

use serde::{Deserialize, Serialize};

use crate::badge::{BadgeIcon, BadgeTone, StatusBadge};

/// Physical progress of an order.
///
/// ```text
/// Processing ──► Dispatched ──► Delivered
///     │              │
///     └──────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    #[default]
    Processing,
    Dispatched,
    /// Terminal.
    Delivered,
    /// Terminal.
    Cancelled,
}

impl FulfillmentStatus {
    pub fn can_dispatch(&self) -> bool {
        matches!(self, FulfillmentStatus::Processing)
    }

    pub fn can_deliver(&self) -> bool {
        matches!(self, FulfillmentStatus::Dispatched)
    }

    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            FulfillmentStatus::Processing | FulfillmentStatus::Dispatched
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FulfillmentStatus::Delivered | FulfillmentStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentStatus::Processing => "processing",
            FulfillmentStatus::Dispatched => "dispatched",
            FulfillmentStatus::Delivered => "delivered",
            FulfillmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(FulfillmentStatus::Processing),
            "dispatched" => Some(FulfillmentStatus::Dispatched),
            "delivered" => Some(FulfillmentStatus::Delivered),
            "cancelled" => Some(FulfillmentStatus::Cancelled),
            _ => None,
        }
    }

    pub fn badge(&self) -> StatusBadge {
        match self {
            FulfillmentStatus::Processing => StatusBadge::new(
                BadgeTone::Yellow,
                BadgeIcon::Package,
                "Processing",
                "प्रक्रिया में",
            ),
            FulfillmentStatus::Dispatched => {
                StatusBadge::new(BadgeTone::Purple, BadgeIcon::Truck, "Dispatched", "भेजा गया")
            }
            FulfillmentStatus::Delivered => StatusBadge::new(
                BadgeTone::Green,
                BadgeIcon::CheckCircle,
                "Delivered",
                "डिलीवर किया गया",
            ),
            FulfillmentStatus::Cancelled => {
                StatusBadge::new(BadgeTone::Gray, BadgeIcon::XCircle, "Cancelled", "रद्द")
            }
        }
    }
}

impl std::fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Money received for an order.
///
/// ```text
/// Pending ──► Paid ──► Refunded
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn can_mark_paid(&self) -> bool {
        matches!(self, PaymentStatus::Pending)
    }

    pub fn can_refund(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn badge(&self) -> StatusBadge {
        match self {
            PaymentStatus::Pending => {
                StatusBadge::new(BadgeTone::Yellow, BadgeIcon::Clock, "Pending", "लंबित")
            }
            PaymentStatus::Paid => {
                StatusBadge::new(BadgeTone::Green, BadgeIcon::CheckCircle, "Paid", "भुगतान हुआ")
            }
            PaymentStatus::Refunded => {
                StatusBadge::new(BadgeTone::Gray, BadgeIcon::XCircle, "Refunded", "धनवापसी हुई")
            }
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
