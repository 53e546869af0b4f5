//! Orders read model, keyed by ID and by order number.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::AggregateId;
use domain::{
    CustomerContact, DocumentNumber, FulfillmentStatus, Money, OrderEvent, OrderLine,
    PaymentStatus, QuotationLink,
};
use event_store::EventEnvelope;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};
use crate::read_model::ReadModel;

#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order_id: AggregateId,
    pub number: DocumentNumber,
    pub contact: CustomerContact,
    pub lines: Vec<OrderLine>,
    pub total_amount: Money,
    pub gst_amount: Money,
    pub final_amount: Money,
    pub status: FulfillmentStatus,
    pub payment_status: PaymentStatus,
    pub tracking_number: Option<String>,
    /// Dispatched before payment was recorded.
    pub dispatched_unpaid: bool,
    pub quotation: Option<QuotationLink>,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    orders: HashMap<AggregateId, OrderSummary>,
    by_number: HashMap<DocumentNumber, AggregateId>,
}

/// Read model of every order, including delivered and cancelled ones.
#[derive(Clone)]
pub struct OrdersView {
    state: Arc<RwLock<State>>,
    position: Arc<RwLock<ProjectionPosition>>,
}

impl OrdersView {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            position: Arc::new(RwLock::new(ProjectionPosition::zero())),
        }
    }

    pub async fn get(&self, order_id: AggregateId) -> Option<OrderSummary> {
        self.state.read().await.orders.get(&order_id).cloned()
    }

    pub async fn get_by_number(&self, number: &DocumentNumber) -> Option<OrderSummary> {
        let state = self.state.read().await;
        state
            .by_number
            .get(number)
            .and_then(|id| state.orders.get(id))
            .cloned()
    }

    /// All orders, newest first.
    pub async fn list(&self) -> Vec<OrderSummary> {
        let mut all: Vec<_> = self.state.read().await.orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub async fn list_by_status(&self, status: FulfillmentStatus) -> Vec<OrderSummary> {
        let mut matching: Vec<_> = self
            .state
            .read()
            .await
            .orders
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    pub async fn recent(&self, limit: usize) -> Vec<OrderSummary> {
        let mut all = self.list().await;
        all.truncate(limit);
        all
    }

    pub async fn total(&self) -> usize {
        self.state.read().await.orders.len()
    }

    pub async fn count_by_status(&self) -> HashMap<FulfillmentStatus, usize> {
        let mut counts = HashMap::new();
        for o in self.state.read().await.orders.values() {
            *counts.entry(o.status).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for OrdersView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Projection for OrdersView {
    fn name(&self) -> &'static str {
        "OrdersView"
    }

    async fn handle(&self, event: &EventEnvelope) -> Result<()> {
        if event.aggregate_type == "Order" {
            let order_event: OrderEvent = event.decode()?;
            let order_id = event.aggregate_id;
            let mut state = self.state.write().await;

            match order_event {
                OrderEvent::OrderPlaced(data) => {
                    state.by_number.insert(data.number.clone(), order_id);
                    state.orders.insert(
                        order_id,
                        OrderSummary {
                            order_id,
                            number: data.number,
                            contact: data.contact,
                            lines: data.lines,
                            total_amount: data.total_amount,
                            gst_amount: data.gst_amount,
                            final_amount: data.final_amount,
                            status: FulfillmentStatus::Processing,
                            payment_status: PaymentStatus::Pending,
                            tracking_number: None,
                            dispatched_unpaid: false,
                            quotation: data.quotation,
                            notes: data.notes,
                            admin_notes: data.admin_notes,
                            cancellation_reason: None,
                            created_at: data.placed_at,
                            updated_at: data.placed_at,
                        },
                    );
                }
                OrderEvent::OrderDispatched(data) => {
                    if let Some(o) = state.orders.get_mut(&order_id) {
                        o.status = FulfillmentStatus::Dispatched;
                        o.tracking_number = data.tracking_number;
                        o.dispatched_unpaid = data.payment_pending;
                        o.updated_at = data.dispatched_at;
                    }
                }
                OrderEvent::OrderDelivered(data) => {
                    if let Some(o) = state.orders.get_mut(&order_id) {
                        o.status = FulfillmentStatus::Delivered;
                        o.updated_at = data.delivered_at;
                    }
                }
                OrderEvent::OrderCancelled(data) => {
                    if let Some(o) = state.orders.get_mut(&order_id) {
                        o.status = FulfillmentStatus::Cancelled;
                        o.cancellation_reason = Some(data.reason);
                        o.updated_at = data.cancelled_at;
                    }
                }
                OrderEvent::PaymentRecorded(data) => {
                    if let Some(o) = state.orders.get_mut(&order_id) {
                        o.payment_status = PaymentStatus::Paid;
                        o.updated_at = data.paid_at;
                    }
                }
                OrderEvent::PaymentRefunded(data) => {
                    if let Some(o) = state.orders.get_mut(&order_id) {
                        o.payment_status = PaymentStatus::Refunded;
                        o.updated_at = data.refunded_at;
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

impl ReadModel for OrdersView {
    fn name(&self) -> &'static str {
        "OrdersView"
    }

    fn count(&self) -> usize {
        self.state.try_read().map(|s| s.orders.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{order_envelope, placed};

    #[tokio::test]
    async fn placed_order_is_indexed_by_number() {
        let view = OrdersView::new();
        let id = AggregateId::new();
        view.handle(&order_envelope(id, 1, &placed(id, "ORD-20250101-0001")))
            .await
            .unwrap();

        let summary = view
            .get_by_number(&DocumentNumber::normalize("ORD-20250101-0001"))
            .await
            .unwrap();
        assert_eq!(summary.order_id, id);
        assert_eq!(summary.status, FulfillmentStatus::Processing);
        assert_eq!(summary.payment_status, PaymentStatus::Pending);
        assert_eq!(summary.final_amount, summary.total_amount + summary.gst_amount);
    }

    #[tokio::test]
    async fn fulfillment_and_payment_are_tracked_separately() {
        let view = OrdersView::new();
        let id = AggregateId::new();
        view.handle(&order_envelope(id, 1, &placed(id, "ORD-20250101-0001")))
            .await
            .unwrap();
        view.handle(&order_envelope(
            id,
            2,
            &OrderEvent::dispatched(Some("DTDC123".to_string()), true),
        ))
        .await
        .unwrap();
        view.handle(&order_envelope(id, 3, &OrderEvent::payment_recorded(None)))
            .await
            .unwrap();

        let summary = view.get(id).await.unwrap();
        assert_eq!(summary.status, FulfillmentStatus::Dispatched);
        assert_eq!(summary.payment_status, PaymentStatus::Paid);
        assert_eq!(summary.tracking_number.as_deref(), Some("DTDC123"));
        assert!(summary.dispatched_unpaid);
    }

    #[tokio::test]
    async fn cancelled_orders_stay_listed() {
        let view = OrdersView::new();
        let id = AggregateId::new();
        view.handle(&order_envelope(id, 1, &placed(id, "ORD-20250101-0001")))
            .await
            .unwrap();
        view.handle(&order_envelope(id, 2, &OrderEvent::cancelled("duplicate")))
            .await
            .unwrap();

        assert_eq!(view.total().await, 1);
        let cancelled = view.list_by_status(FulfillmentStatus::Cancelled).await;
        assert_eq!(cancelled[0].cancellation_reason.as_deref(), Some("duplicate"));
        assert_eq!(
            view.count_by_status().await.get(&FulfillmentStatus::Cancelled),
            Some(&1)
        );
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let view = OrdersView::new();
        let id = AggregateId::new();
        view.handle(&order_envelope(id, 1, &placed(id, "ORD-20250101-0001")))
            .await
            .unwrap();

        view.reset().await.unwrap();
        assert_eq!(view.total().await, 0);
        assert_eq!(view.position().await.events_processed, 0);
    }
}
