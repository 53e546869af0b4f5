//! Presentation hints for status values.
//!
//! Each status enum maps itself to a [`StatusBadge`] with an exhaustive
//! `match`, so adding a status without a badge is a compile error.

use common::Localized;
use serde::{Deserialize, Serialize};

/// Colour family of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Blue,
    Green,
    Red,
    Purple,
    Yellow,
    Gray,
}

/// Icon shown next to a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeIcon {
    Clock,
    CheckCircle,
    XCircle,
    Package,
    Truck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBadge {
    pub tone: BadgeTone,
    pub icon: BadgeIcon,
    pub label: Localized,
}

impl StatusBadge {
    pub(crate) fn new(tone: BadgeTone, icon: BadgeIcon, en: &str, hi: &str) -> Self {
        Self {
            tone,
            icon,
            label: Localized::new(en, hi),
        }
    }
}
