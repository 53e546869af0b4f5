//! Quotation endpoints: the public checkout submission and the admin
//! review workflow.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::AggregateId;
use domain::{
    ApproveQuotation, ContactForm, DocumentNumber, Money, NewLineItem,
    QuotationStatus, RejectQuotation, RequestQuotation,
};
use event_store::EventStore;
use saga::{ConversionRequest, Converted, LinePrice};
use serde::{Deserialize, Serialize};

use super::{QuotationResponse, parse_aggregate_id};
use crate::auth::RequireAdmin;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitQuotationRequest {
    #[serde(flatten)]
    pub contact: ContactForm,
    pub items: Vec<NewLineItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuotationResponse {
    pub quotation_id: AggregateId,
    pub quotation_number: DocumentNumber,
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub approved_total: Money,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub line_prices: Vec<LinePrice>,
    #[serde(default)]
    pub gst_amount: Money,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// POST /quotations
#[tracing::instrument(skip(state, req), fields(items = req.items.len()))]
pub async fn submit<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SubmitQuotationRequest>,
) -> Result<(StatusCode, Json<SubmitQuotationResponse>), ApiError> {
    let mut cmd = RequestQuotation::new(req.contact, req.items);
    if let Some(notes) = req.notes.filter(|n| !n.trim().is_empty()) {
        cmd = cmd.with_notes(notes);
    }

    let quotation_id = cmd.quotation_id;
    state.quotation_service.submit_quotation(cmd).await?;

    state.refresh().await?;
    let quotation = read_quotation(&state, quotation_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitQuotationResponse {
            quotation_id,
            quotation_number: quotation.quotation.number,
        }),
    ))
}

/// GET /admin/quotations?status=requested
pub async fn list<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<Vec<QuotationResponse>>, ApiError> {
    state.refresh().await?;

    let quotations = match filter.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => {
            let status = QuotationStatus::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown quotation status: {raw}")))?;
            state.quotations.list_by_status(status).await
        }
        None => state.quotations.list().await,
    };

    Ok(Json(quotations.into_iter().map(Into::into).collect()))
}

/// GET /admin/quotations/{id}
pub async fn get<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<QuotationResponse>, ApiError> {
    let quotation_id = parse_aggregate_id(&id)?;
    state.refresh().await?;
    read_quotation(&state, quotation_id).await.map(Json)
}

/// POST /admin/quotations/{id}/approve
#[tracing::instrument(skip(_admin, state, req))]
pub async fn approve<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<QuotationResponse>, ApiError> {
    let quotation_id = parse_aggregate_id(&id)?;

    let mut cmd = ApproveQuotation::new(quotation_id, req.approved_total);
    if let Some(notes) = req.admin_notes {
        cmd = cmd.with_notes(notes);
    }
    state.quotation_service.approve_quotation(cmd).await?;

    state.refresh().await?;
    read_quotation(&state, quotation_id).await.map(Json)
}

/// POST /admin/quotations/{id}/reject
#[tracing::instrument(skip(_admin, state, req))]
pub async fn reject<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> Result<Json<QuotationResponse>, ApiError> {
    let quotation_id = parse_aggregate_id(&id)?;

    let mut cmd = RejectQuotation::new(quotation_id);
    if let Some(notes) = req.admin_notes {
        cmd = cmd.with_notes(notes);
    }
    state.quotation_service.reject_quotation(cmd).await?;

    state.refresh().await?;
    read_quotation(&state, quotation_id).await.map(Json)
}

/// POST /admin/quotations/{id}/convert
#[tracing::instrument(skip(_admin, state, req))]
pub async fn convert<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<ConvertRequest>,
) -> Result<(StatusCode, Json<Converted>), ApiError> {
    let quotation_id = parse_aggregate_id(&id)?;

    let request = ConversionRequest {
        quotation_id,
        line_prices: req.line_prices,
        gst_amount: req.gst_amount,
        address: req.address,
        admin_notes: req.admin_notes,
    };

    let converted = state.conversion.convert(request).await?;
    state.refresh().await?;

    Ok((StatusCode::CREATED, Json(converted)))
}

async fn read_quotation<S: EventStore + Clone + 'static>(
    state: &AppState<S>,
    quotation_id: AggregateId,
) -> Result<QuotationResponse, ApiError> {
    state
        .quotations
        .get(quotation_id)
        .await
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound(format!("Quotation {quotation_id} not found")))
}
