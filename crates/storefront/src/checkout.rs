//! Turning the cart into a quotation request.

use async_trait::async_trait;
use domain::quotation::validate_lines;
use domain::{
    ContactForm, DocumentNumber, DomainError, NewLineItem, QuotationService, RequestQuotation,
    ValidationErrors,
};
use event_store::EventStore;
use serde::{Deserialize, Serialize};

use crate::context::StorefrontContext;
use crate::error::CheckoutError;

/// Where checkout submissions go.
#[async_trait]
pub trait QuotationGateway: Send + Sync {
    /// Records the request and returns the quotation number it was given.
    async fn submit(&self, request: RequestQuotation) -> Result<DocumentNumber, CheckoutError>;
}

/// Submits straight to a [`QuotationService`] in the same process.
pub struct InProcessGateway<S: EventStore> {
    service: QuotationService<S>,
}

impl<S: EventStore> InProcessGateway<S> {
    pub fn new(service: QuotationService<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: EventStore> QuotationGateway for InProcessGateway<S> {
    async fn submit(&self, request: RequestQuotation) -> Result<DocumentNumber, CheckoutError> {
        match self.service.submit_quotation(request).await {
            Ok(result) => result
                .aggregate
                .number()
                .cloned()
                .ok_or_else(|| CheckoutError::Gateway("quotation was stored without a number".to_string())),
            Err(DomainError::Validation(errors)) => Err(CheckoutError::Rejected(errors)),
            Err(e) => Err(CheckoutError::Gateway(e.to_string())),
        }
    }
}

/// The checkout form as filled in by the customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(flatten)]
    pub contact: ContactForm,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The three ways a checkout can end.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Recorded; the cart has been cleared.
    Submitted { quotation_number: DocumentNumber },
    /// Field errors to show next to the form. Nothing was sent or the
    /// server refused the same fields.
    Invalid(ValidationErrors),
    /// Nothing was recorded. The cart is untouched.
    Failed(CheckoutError),
}

pub struct Checkout<G: QuotationGateway> {
    gateway: G,
}

impl<G: QuotationGateway> Checkout<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Validates locally, submits the cart, and clears it on success.
    #[tracing::instrument(skip_all)]
    pub async fn submit(&self, ctx: &StorefrontContext, form: CheckoutForm) -> CheckoutOutcome {
        let cart = ctx.cart().items().await;
        if cart.is_empty() {
            return CheckoutOutcome::Failed(CheckoutError::EmptyCart);
        }
        let lines: Vec<NewLineItem> = cart.into_iter().map(NewLineItem::from).collect();

        let mut errors = ValidationErrors::new();
        if let Err(e) = form.contact.validate() {
            errors.errors.extend(e.errors);
        }
        if let Err(e) = validate_lines(&lines) {
            errors.errors.extend(e.errors);
        }
        if !errors.is_empty() {
            tracing::info!(failed_fields = errors.errors.len(), "checkout blocked by validation");
            return CheckoutOutcome::Invalid(errors);
        }

        let mut request = RequestQuotation::new(form.contact, lines);
        if let Some(notes) = form.notes.filter(|n| !n.trim().is_empty()) {
            request = request.with_notes(notes);
        }

        match self.gateway.submit(request).await {
            Ok(quotation_number) => {
                ctx.cart().clear().await;
                tracing::info!(%quotation_number, "quotation request submitted");
                CheckoutOutcome::Submitted { quotation_number }
            }
            Err(CheckoutError::Rejected(errors)) => CheckoutOutcome::Invalid(errors),
            Err(e) => {
                tracing::warn!(error = %e, "quotation submission failed");
                CheckoutOutcome::Failed(e)
            }
        }
    }
}
