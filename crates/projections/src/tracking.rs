//! Customer-facing status lookup by document number and mobile number.
//!
//! A record is returned only when both the number and the mobile match. A
//! wrong mobile is indistinguishable from a number that does not exist.

use common::Localized;
use domain::{
    DocumentKind, DocumentNumber, Field, FieldError, MobileNumber, ValidationErrors,
};
use serde::Serialize;
use thiserror::Error;

use crate::views::{OrderSummary, OrdersView, QuotationSummary, QuotationsView};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackedDocument {
    Quotation(QuotationSummary),
    Order(OrderSummary),
}

#[derive(Debug, Error)]
pub enum TrackingError {
    /// Missing number or malformed mobile. Never reveals whether a record
    /// exists.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("No matching record")]
    NotFound {
        /// Prefix-derived kind, used only to word the message.
        kind: Option<DocumentKind>,
    },
}

impl TrackingError {
    /// Message shown on the tracking page.
    pub fn message(&self) -> Localized {
        match self {
            TrackingError::Validation(_) => Localized::new(
                "Please enter both number and mobile",
                "कृपया नंबर और मोबाइल दोनों दर्ज करें",
            ),
            TrackingError::NotFound {
                kind: Some(DocumentKind::Quotation),
            } => Localized::new("Quotation not found", "कोटेशन नहीं मिला"),
            TrackingError::NotFound {
                kind: Some(DocumentKind::Order),
            } => Localized::new("Order not found", "ऑर्डर नहीं मिला"),
            TrackingError::NotFound { kind: None } => {
                Localized::new("No matching record found", "कोई मेल खाता रिकॉर्ड नहीं मिला")
            }
        }
    }
}

/// Looks up quotations and orders for the tracking page.
#[derive(Clone)]
pub struct TrackingLookup {
    quotations: QuotationsView,
    orders: OrdersView,
}

impl TrackingLookup {
    pub fn new(quotations: QuotationsView, orders: OrdersView) -> Self {
        Self { quotations, orders }
    }

    /// Finds at most one record matching `identifier` and `mobile`.
    ///
    /// The identifier is trimmed and uppercased. `QT-` numbers search only
    /// quotations, `ORD-` only orders, anything else searches both.
    #[tracing::instrument(skip(self, mobile))]
    pub async fn lookup(
        &self,
        identifier: &str,
        mobile: &str,
    ) -> Result<TrackedDocument, TrackingError> {
        let result = self.find(identifier, mobile).await;

        let outcome = match &result {
            Ok(TrackedDocument::Quotation(_)) => "quotation",
            Ok(TrackedDocument::Order(_)) => "order",
            Err(TrackingError::NotFound { .. }) => "not_found",
            Err(TrackingError::Validation(_)) => "invalid",
        };
        metrics::counter!("tracking_lookups_total", "outcome" => outcome).increment(1);
        tracing::debug!(outcome, "tracking lookup");

        result
    }

    async fn find(&self, identifier: &str, mobile: &str) -> Result<TrackedDocument, TrackingError> {
        let number = DocumentNumber::normalize(identifier);
        let mobile = Self::validate(&number, mobile)?;
        let kind = number.kind();

        if kind != Some(DocumentKind::Order)
            && let Some(q) = self.quotations.get_by_number(&number).await
            && q.contact.mobile == mobile
        {
            return Ok(TrackedDocument::Quotation(q));
        }

        if kind != Some(DocumentKind::Quotation)
            && let Some(o) = self.orders.get_by_number(&number).await
            && o.contact.mobile == mobile
        {
            return Ok(TrackedDocument::Order(o));
        }

        Err(TrackingError::NotFound { kind })
    }

    fn validate(number: &DocumentNumber, mobile: &str) -> Result<MobileNumber, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if number.is_empty() {
            errors.push(FieldError::new(
                Field::Number,
                "Quotation or order number is required",
                "कोटेशन या ऑर्डर नंबर आवश्यक है",
            ));
        }

        match MobileNumber::parse(mobile) {
            Ok(mobile) if errors.is_empty() => Ok(mobile),
            Ok(_) => Err(errors),
            Err(e) => {
                errors.push(e);
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projection;
    use crate::views::test_support::{order_envelope, placed, quotation_envelope, requested};
    use common::AggregateId;

    async fn seeded() -> TrackingLookup {
        let quotations = QuotationsView::new();
        let orders = OrdersView::new();

        let q = AggregateId::new();
        quotations
            .handle(&quotation_envelope(q, 1, &requested(q, "QT-20250101-0007")))
            .await
            .unwrap();
        let o = AggregateId::new();
        orders
            .handle(&order_envelope(o, 1, &placed(o, "ORD-20250101-0003")))
            .await
            .unwrap();

        TrackingLookup::new(quotations, orders)
    }

    #[tokio::test]
    async fn finds_quotation_with_matching_mobile() {
        let lookup = seeded().await;
        let found = lookup.lookup("  qt-20250101-0007 ", "9876543210").await.unwrap();
        match found {
            TrackedDocument::Quotation(q) => assert_eq!(q.number.as_str(), "QT-20250101-0007"),
            other => panic!("expected quotation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn finds_order_with_matching_mobile() {
        let lookup = seeded().await;
        let found = lookup.lookup("ORD-20250101-0003", "9876543210").await.unwrap();
        assert!(matches!(found, TrackedDocument::Order(_)));
    }

    #[tokio::test]
    async fn wrong_mobile_looks_like_missing_record() {
        let lookup = seeded().await;

        let wrong_mobile = lookup
            .lookup("QT-20250101-0007", "9123456789")
            .await
            .unwrap_err();
        let missing = lookup
            .lookup("QT-20250101-0099", "9876543210")
            .await
            .unwrap_err();

        assert!(matches!(wrong_mobile, TrackingError::NotFound { .. }));
        assert!(matches!(missing, TrackingError::NotFound { .. }));
        assert_eq!(wrong_mobile.message(), missing.message());
    }

    #[tokio::test]
    async fn empty_store_returns_not_found() {
        let lookup = TrackingLookup::new(QuotationsView::new(), OrdersView::new());
        let err = lookup
            .lookup("QT-20250101-0007", "9876543210")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackingError::NotFound {
                kind: Some(DocumentKind::Quotation)
            }
        ));
    }

    #[tokio::test]
    async fn prefix_restricts_search() {
        let lookup = seeded().await;
        // An order number never matches a quotation record and vice versa.
        assert!(lookup.lookup("ORD-20250101-0007", "9876543210").await.is_err());
        assert!(lookup.lookup("QT-20250101-0003", "9876543210").await.is_err());
    }

    #[tokio::test]
    async fn empty_identifier_and_bad_mobile_are_validation_errors() {
        let lookup = seeded().await;

        match lookup.lookup("   ", "12345").await.unwrap_err() {
            TrackingError::Validation(errors) => {
                assert!(errors.for_field(Field::Number).is_some());
                assert!(errors.for_field(Field::Mobile).is_some());
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        assert!(matches!(
            lookup.lookup("QT-20250101-0007", "").await,
            Err(TrackingError::Validation(_))
        ));
    }
}
