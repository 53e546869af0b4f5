//! Quotations read model, keyed by ID and by quotation number.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::AggregateId;
use domain::{
    CustomerContact, DocumentNumber, LineItem, Money, QuotationEvent, QuotationStatus,
};
use event_store::EventEnvelope;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};
use crate::read_model::ReadModel;

/// Everything the admin panel and tracking page show for one quotation.
#[derive(Debug, Clone, Serialize)]
pub struct QuotationSummary {
    pub quotation_id: AggregateId,
    pub number: DocumentNumber,
    pub contact: CustomerContact,
    pub items: Vec<LineItem>,
    pub total_items: u32,
    pub estimated_total: Option<Money>,
    pub approved_total: Option<Money>,
    pub status: QuotationStatus,
    pub customer_notes: Option<String>,
    pub admin_notes: Option<String>,
    pub order_id: Option<AggregateId>,
    pub order_number: Option<DocumentNumber>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    quotations: HashMap<AggregateId, QuotationSummary>,
    by_number: HashMap<DocumentNumber, AggregateId>,
}

/// Read model of every quotation ever submitted. Quotations are never
/// removed.
#[derive(Clone)]
pub struct QuotationsView {
    state: Arc<RwLock<State>>,
    position: Arc<RwLock<ProjectionPosition>>,
}

impl QuotationsView {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            position: Arc::new(RwLock::new(ProjectionPosition::zero())),
        }
    }

    pub async fn get(&self, quotation_id: AggregateId) -> Option<QuotationSummary> {
        self.state.read().await.quotations.get(&quotation_id).cloned()
    }

    pub async fn get_by_number(&self, number: &DocumentNumber) -> Option<QuotationSummary> {
        let state = self.state.read().await;
        state
            .by_number
            .get(number)
            .and_then(|id| state.quotations.get(id))
            .cloned()
    }

    /// All quotations, newest first.
    pub async fn list(&self) -> Vec<QuotationSummary> {
        let mut all: Vec<_> = self.state.read().await.quotations.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Quotations in `status`, newest first.
    pub async fn list_by_status(&self, status: QuotationStatus) -> Vec<QuotationSummary> {
        let mut matching: Vec<_> = self
            .state
            .read()
            .await
            .quotations
            .values()
            .filter(|q| q.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    pub async fn recent(&self, limit: usize) -> Vec<QuotationSummary> {
        let mut all = self.list().await;
        all.truncate(limit);
        all
    }

    pub async fn total(&self) -> usize {
        self.state.read().await.quotations.len()
    }

    pub async fn count_by_status(&self) -> HashMap<QuotationStatus, usize> {
        let mut counts = HashMap::new();
        for q in self.state.read().await.quotations.values() {
            *counts.entry(q.status).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for QuotationsView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Projection for QuotationsView {
    fn name(&self) -> &'static str {
        "QuotationsView"
    }

    async fn handle(&self, event: &EventEnvelope) -> Result<()> {
        if event.aggregate_type == "Quotation" {
            let quotation_event: QuotationEvent = event.decode()?;
            let quotation_id = event.aggregate_id;
            let mut state = self.state.write().await;

            match quotation_event {
                QuotationEvent::QuotationRequested(data) => {
                    state.by_number.insert(data.number.clone(), quotation_id);
                    state.quotations.insert(
                        quotation_id,
                        QuotationSummary {
                            quotation_id,
                            number: data.number,
                            contact: data.contact,
                            items: data.items,
                            total_items: data.total_items,
                            estimated_total: data.estimated_total,
                            approved_total: None,
                            status: QuotationStatus::Requested,
                            customer_notes: data.customer_notes,
                            admin_notes: None,
                            order_id: None,
                            order_number: None,
                            created_at: data.requested_at,
                            updated_at: data.requested_at,
                        },
                    );
                }
                QuotationEvent::QuotationApproved(data) => {
                    if let Some(q) = state.quotations.get_mut(&quotation_id) {
                        q.status = QuotationStatus::Approved;
                        q.approved_total = Some(data.approved_total);
                        q.admin_notes = data.admin_notes;
                        q.updated_at = data.approved_at;
                    }
                }
                QuotationEvent::QuotationRejected(data) => {
                    if let Some(q) = state.quotations.get_mut(&quotation_id) {
                        q.status = QuotationStatus::Rejected;
                        q.admin_notes = data.admin_notes;
                        q.updated_at = data.rejected_at;
                    }
                }
                QuotationEvent::QuotationConverted(data) => {
                    if let Some(q) = state.quotations.get_mut(&quotation_id) {
                        q.status = QuotationStatus::ConvertedToOrder;
                        q.order_id = Some(data.order_id);
                        q.order_number = Some(data.order_number);
                        q.updated_at = data.converted_at;
                    }
                }
            }
        }

        let mut pos = self.position.write().await;
        *pos = pos.advance();

        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        *self.position.read().await
    }

    async fn reset(&self) -> Result<()> {
        *self.state.write().await = State::default();
        *self.position.write().await = ProjectionPosition::zero();
        Ok(())
    }
}

impl ReadModel for QuotationsView {
    fn name(&self) -> &'static str {
        "QuotationsView"
    }

    fn count(&self) -> usize {
        // Non-blocking; reports 0 while a writer holds the lock.
        self.state.try_read().map(|s| s.quotations.len()).unwrap_or(0)
    }
}
