//! Admin dashboard summary.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use event_store::EventStore;
use projections::DashboardStats;
use serde::Serialize;

use crate::auth::RequireAdmin;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub product_count: usize,
}

/// GET /admin/dashboard
pub async fn get<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<DashboardResponse>, ApiError> {
    state.refresh().await?;

    Ok(Json(DashboardResponse {
        stats: state.dashboard.stats().await,
        product_count: state.catalog.product_count().await?,
    }))
}
