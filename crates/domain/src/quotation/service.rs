//! Quotation service: validation, numbering and command dispatch.

use std::sync::Arc;

use chrono::Utc;
use common::AggregateId;
use event_store::{EventStore, NumberSequence};

use crate::command::{CommandHandler, CommandResult};
use crate::contact::ValidationErrors;
use crate::error::DomainError;
use crate::numbering::{DocumentKind, next_document_number};

use super::{
    ApproveQuotation, MarkQuotationConverted, Quotation, QuotationError, RejectQuotation,
    RequestQuotation, validate_lines,
};

impl From<QuotationError> for DomainError {
    fn from(e: QuotationError) -> Self {
        DomainError::Quotation(e)
    }
}

/// Entry point for every quotation operation.
pub struct QuotationService<S: EventStore> {
    handler: CommandHandler<S, Quotation>,
    numbers: Arc<dyn NumberSequence>,
}

impl<S: EventStore> QuotationService<S> {
    pub fn new(store: S, numbers: Arc<dyn NumberSequence>) -> Self {
        Self {
            handler: CommandHandler::new(store),
            numbers,
        }
    }

    pub fn handler(&self) -> &CommandHandler<S, Quotation> {
        &self.handler
    }

    /// Validates a checkout and records it as a new quotation.
    ///
    /// Contact and line problems are reported together as
    /// [`DomainError::Validation`] before a number is drawn, so rejected
    /// submissions do not consume quotation numbers.
    #[tracing::instrument(skip(self, cmd), fields(quotation_id = %cmd.quotation_id))]
    pub async fn submit_quotation(
        &self,
        cmd: RequestQuotation,
    ) -> Result<CommandResult<Quotation>, DomainError> {
        let contact = cmd.contact.validate();
        let lines = validate_lines(&cmd.items);

        let contact = match (contact, lines) {
            (Ok(contact), Ok(())) => contact,
            (contact, lines) => {
                let mut errors = ValidationErrors::new();
                if let Err(e) = contact {
                    errors.errors.extend(e.errors);
                }
                if let Err(e) = lines {
                    errors.errors.extend(e.errors);
                }
                tracing::info!(failed_fields = errors.errors.len(), "quotation rejected by validation");
                return Err(errors.into());
            }
        };

        let number = next_document_number(
            self.numbers.as_ref(),
            DocumentKind::Quotation,
            Utc::now().date_naive(),
        )
        .await?;

        let quotation_id = cmd.quotation_id;
        let result = self
            .handler
            .execute(quotation_id, |q| {
                q.request(quotation_id, number, contact, cmd.items, cmd.customer_notes)
            })
            .await?;

        metrics::counter!("quotations_submitted_total").increment(1);
        tracing::info!(
            number = %result.aggregate.number().map(|n| n.as_str()).unwrap_or_default(),
            total_items = result.aggregate.total_items(),
            "quotation submitted"
        );

        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    pub async fn approve_quotation(
        &self,
        cmd: ApproveQuotation,
    ) -> Result<CommandResult<Quotation>, DomainError> {
        let result = self
            .handler
            .execute(cmd.quotation_id, |q| {
                q.approve(cmd.approved_total, cmd.admin_notes)
            })
            .await?;

        metrics::counter!("quotations_approved_total").increment(1);
        tracing::info!(approved_total = %cmd.approved_total, "quotation approved");
        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    pub async fn reject_quotation(
        &self,
        cmd: RejectQuotation,
    ) -> Result<CommandResult<Quotation>, DomainError> {
        let result = self
            .handler
            .execute(cmd.quotation_id, |q| q.reject(cmd.admin_notes))
            .await?;

        metrics::counter!("quotations_rejected_total").increment(1);
        tracing::info!("quotation rejected");
        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    pub async fn mark_converted(
        &self,
        cmd: MarkQuotationConverted,
    ) -> Result<CommandResult<Quotation>, DomainError> {
        let result = self
            .handler
            .execute(cmd.quotation_id, |q| {
                q.mark_converted(cmd.order_id, cmd.order_number)
            })
            .await?;

        tracing::info!(order_id = %cmd.order_id, "quotation converted to order");
        Ok(result)
    }

    /// Loads a quotation, or `None` if it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_quotation(
        &self,
        quotation_id: AggregateId,
    ) -> Result<Option<Quotation>, DomainError> {
        self.handler.load_existing(quotation_id).await
    }
}
