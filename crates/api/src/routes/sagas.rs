//! Conversion saga inspection for the admin panel.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::AggregateId;
use domain::DocumentNumber;
use event_store::EventStore;
use saga::{SagaInstance, SagaState};
use serde::Serialize;

use super::parse_aggregate_id;
use crate::auth::RequireAdmin;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SagaResponse {
    pub saga_id: AggregateId,
    pub state: SagaState,
    pub finished: bool,
    pub can_retry: bool,
    pub quotation_id: Option<AggregateId>,
    pub completed_steps: Vec<String>,
    pub order_id: Option<AggregateId>,
    pub order_number: Option<DocumentNumber>,
    pub failed_step: Option<String>,
    pub failure_reason: Option<String>,
}

impl SagaResponse {
    fn new(saga_id: AggregateId, saga: &SagaInstance) -> Self {
        Self {
            saga_id,
            state: saga.state(),
            finished: saga.state().is_terminal(),
            can_retry: saga.state().allows_retry(),
            quotation_id: saga.quotation_id(),
            completed_steps: saga.completed_steps().to_vec(),
            order_id: saga.order_id(),
            order_number: saga.order_number().cloned(),
            failed_step: saga.failed_step().map(str::to_string),
            failure_reason: saga.failure_reason().map(str::to_string),
        }
    }
}

/// GET /admin/sagas/{id}
pub async fn get<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<SagaResponse>, ApiError> {
    let saga_id = parse_aggregate_id(&id)?;

    let saga = state
        .conversion
        .get_saga(saga_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Saga {id} not found")))?;

    Ok(Json(SagaResponse::new(saga_id, &saga)))
}
