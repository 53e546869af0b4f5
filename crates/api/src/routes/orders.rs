//! Admin order endpoints: listing, fulfillment and payment.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::AggregateId;
use domain::{
    CancelOrder, DeliverOrder, DispatchOrder, FulfillmentStatus, RecordPayment, RefundPayment,
};
use event_store::EventStore;
use serde::Deserialize;

use super::quotations::StatusFilter;
use super::{OrderResponse, parse_aggregate_id};
use crate::auth::RequireAdmin;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DispatchRequest {
    #[serde(default)]
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentAction {
    Paid,
    Refunded,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub action: PaymentAction,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// GET /admin/orders?status=dispatched
pub async fn list<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    state.refresh().await?;

    let orders = match filter.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => {
            let status = FulfillmentStatus::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown order status: {raw}")))?;
            state.orders.list_by_status(status).await
        }
        None => state.orders.list().await,
    };

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// GET /admin/orders/{id}
pub async fn get<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_aggregate_id(&id)?;
    state.refresh().await?;
    read_order(&state, order_id).await.map(Json)
}

/// POST /admin/orders/{id}/dispatch
#[tracing::instrument(skip(_admin, state, req))]
pub async fn dispatch<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<DispatchRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_aggregate_id(&id)?;

    let mut cmd = DispatchOrder::new(order_id);
    if let Some(tracking) = req.tracking_number.filter(|t| !t.trim().is_empty()) {
        cmd = cmd.with_tracking_number(tracking.trim());
    }
    state.order_service.dispatch_order(cmd).await?;

    state.refresh().await?;
    read_order(&state, order_id).await.map(Json)
}

/// POST /admin/orders/{id}/deliver
#[tracing::instrument(skip(_admin, state))]
pub async fn deliver<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_aggregate_id(&id)?;
    state.order_service.deliver_order(DeliverOrder::new(order_id)).await?;

    state.refresh().await?;
    read_order(&state, order_id).await.map(Json)
}

/// POST /admin/orders/{id}/cancel
#[tracing::instrument(skip(_admin, state, req))]
pub async fn cancel<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_aggregate_id(&id)?;
    let reason = req.reason.trim();
    if reason.is_empty() {
        return Err(ApiError::BadRequest(
            "Cancellation reason is required".to_string(),
        ));
    }

    state
        .order_service
        .cancel_order(CancelOrder::new(order_id, reason))
        .await?;

    state.refresh().await?;
    read_order(&state, order_id).await.map(Json)
}

/// POST /admin/orders/{id}/payment
#[tracing::instrument(skip(_admin, state, req), fields(action = ?req.action))]
pub async fn payment<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_aggregate_id(&id)?;

    match req.action {
        PaymentAction::Paid => {
            let mut cmd = RecordPayment::new(order_id);
            if let Some(reference) = req.reference {
                cmd = cmd.with_reference(reference);
            }
            state.order_service.record_payment(cmd).await?;
        }
        PaymentAction::Refunded => {
            let mut cmd = RefundPayment::new(order_id);
            if let Some(reason) = req.reason {
                cmd = cmd.with_reason(reason);
            }
            state.order_service.refund_payment(cmd).await?;
        }
    }

    state.refresh().await?;
    read_order(&state, order_id).await.map(Json)
}

async fn read_order<S: EventStore + Clone + 'static>(
    state: &AppState<S>,
    order_id: AggregateId,
) -> Result<OrderResponse, ApiError> {
    state
        .orders
        .get(order_id)
        .await
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound(format!("Order {order_id} not found")))
}
