//! Quotation state machine.

use common::Localized;
use serde::{Deserialize, Serialize};

use crate::badge::{BadgeIcon, BadgeTone, StatusBadge};

/// Where a quotation is in its review lifecycle.
///
/// ```text
/// Requested ──┬──► Approved ──► ConvertedToOrder
///             └──► Rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    /// Submitted by a customer, awaiting staff review.
    #[default]
    Requested,

    /// Priced and accepted by staff.
    Approved,

    /// Declined by staff (terminal).
    Rejected,

    /// An order was created from it (terminal).
    ConvertedToOrder,
}

impl QuotationStatus {
    pub fn can_approve(&self) -> bool {
        matches!(self, QuotationStatus::Requested)
    }

    pub fn can_reject(&self) -> bool {
        matches!(self, QuotationStatus::Requested)
    }

    pub fn can_convert(&self) -> bool {
        matches!(self, QuotationStatus::Approved)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuotationStatus::Rejected | QuotationStatus::ConvertedToOrder
        )
    }

    /// Wire name, as used in JSON and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Requested => "requested",
            QuotationStatus::Approved => "approved",
            QuotationStatus::Rejected => "rejected",
            QuotationStatus::ConvertedToOrder => "converted_to_order",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "requested" => Some(QuotationStatus::Requested),
            "approved" => Some(QuotationStatus::Approved),
            "rejected" => Some(QuotationStatus::Rejected),
            "converted_to_order" => Some(QuotationStatus::ConvertedToOrder),
            _ => None,
        }
    }

    pub fn label(&self) -> Localized {
        self.badge().label
    }

    pub fn badge(&self) -> StatusBadge {
        match self {
            QuotationStatus::Requested => {
                StatusBadge::new(BadgeTone::Blue, BadgeIcon::Clock, "Requested", "अनुरोध किया गया")
            }
            QuotationStatus::Approved => {
                StatusBadge::new(BadgeTone::Green, BadgeIcon::CheckCircle, "Approved", "स्वीकृत")
            }
            QuotationStatus::Rejected => {
                StatusBadge::new(BadgeTone::Red, BadgeIcon::XCircle, "Rejected", "अस्वीकृत")
            }
            QuotationStatus::ConvertedToOrder => StatusBadge::new(
                BadgeTone::Purple,
                BadgeIcon::Package,
                "Converted",
                "ऑर्डर में बदला गया",
            ),
        }
    }
}

impl std::fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [QuotationStatus; 4] = [
        QuotationStatus::Requested,
        QuotationStatus::Approved,
        QuotationStatus::Rejected,
        QuotationStatus::ConvertedToOrder,
    ];

    #[test]
    fn only_requested_can_be_reviewed() {
        for status in ALL {
            let requested = status == QuotationStatus::Requested;
            assert_eq!(status.can_approve(), requested, "{status}");
            assert_eq!(status.can_reject(), requested, "{status}");
        }
    }

    #[test]
    fn only_approved_can_be_converted() {
        for status in ALL {
            assert_eq!(status.can_convert(), status == QuotationStatus::Approved);
        }
    }

    #[test]
    fn terminal_states_allow_nothing() {
        for status in ALL.into_iter().filter(QuotationStatus::is_terminal) {
            assert!(!status.can_approve());
            assert!(!status.can_reject());
            assert!(!status.can_convert());
        }
    }

    #[test]
    fn wire_names_round_trip() {
        for status in ALL {
            assert_eq!(QuotationStatus::parse(status.as_str()), Some(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(QuotationStatus::parse("pending"), None);
    }

    #[test]
    fn badges_carry_both_languages() {
        let badge = QuotationStatus::Requested.badge();
        assert_eq!(badge.tone, BadgeTone::Blue);
        assert_eq!(badge.icon, BadgeIcon::Clock);
        assert_eq!(badge.label.hi, "अनुरोध किया गया");

        assert_eq!(QuotationStatus::Rejected.badge().tone, BadgeTone::Red);
        assert_eq!(QuotationStatus::ConvertedToOrder.label().en, "Converted");
    }
}
