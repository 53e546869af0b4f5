//! Public order and quotation tracking.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use event_store::EventStore;
use projections::TrackedDocument;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub mobile: String,
}

/// POST /track
///
/// Answers 404 for both an unknown number and a mobile that does not match.
pub async fn track<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<TrackRequest>,
) -> Result<Json<TrackedDocument>, ApiError> {
    state.refresh().await?;
    let document = state.tracking.lookup(&req.number, &req.mobile).await?;
    Ok(Json(document))
}
