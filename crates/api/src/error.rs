//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::Localized;
use domain::{CatalogError, DomainError, OrderError, QuotationError, ValidationErrors};
use event_store::EventStoreError;
use projections::{ProjectionError, TrackingError};
use saga::SagaError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    /// Malformed input: bad IDs, unknown status filters.
    BadRequest(String),
    Unauthorized,
    Validation(ValidationErrors),
    Domain(DomainError),
    Saga(SagaError),
    Tracking(TrackingError),
    Catalog(CatalogError),
    Projection(ProjectionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, error_body(msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body(msg)),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, error_body("Unauthorized")),
            ApiError::Validation(errors) => validation_response(&errors),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Saga(err) => saga_error_to_response(err),
            ApiError::Tracking(err) => tracking_error_to_response(err),
            ApiError::Catalog(err) => internal(&err),
            ApiError::Projection(err) => internal(&err),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn error_body(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "error": message.into() })
}

fn validation_response(errors: &ValidationErrors) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        serde_json::json!({ "error": "Validation failed", "fields": errors.errors }),
    )
}

/// Logs the cause and answers with a generic body.
fn internal(err: &dyn std::error::Error) -> (StatusCode, serde_json::Value) {
    tracing::error!(error = %err, "internal server error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_body("Internal server error"),
    )
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, serde_json::Value) {
    match &err {
        DomainError::Validation(errors) => validation_response(errors),
        _ if err.is_not_found() => (StatusCode::NOT_FOUND, error_body(err.to_string())),
        _ if err.is_invalid_transition() => (StatusCode::CONFLICT, error_body(err.to_string())),
        DomainError::EventStore(EventStoreError::ConcurrencyConflict { .. })
        | DomainError::Quotation(QuotationError::AlreadyRequested)
        | DomainError::Order(OrderError::AlreadyPlaced) => {
            (StatusCode::CONFLICT, error_body(err.to_string()))
        }
        DomainError::Quotation(QuotationError::InvalidApprovedTotal(_))
        | DomainError::Order(
            OrderError::MissingAddress
            | OrderError::NoLines
            | OrderError::InvalidQuantity { .. }
            | OrderError::LineTotalMismatch { .. }
            | OrderError::TotalMismatch { .. }
            | OrderError::FinalAmountMismatch { .. }
            | OrderError::NegativeAmount
            | OrderError::AmountOverflow,
        ) => (StatusCode::UNPROCESSABLE_ENTITY, error_body(err.to_string())),
        _ => internal(&err),
    }
}

fn saga_error_to_response(err: SagaError) -> (StatusCode, serde_json::Value) {
    match err {
        SagaError::Domain(inner) => domain_error_to_response(inner),
        SagaError::QuotationNotFound(_) => (StatusCode::NOT_FOUND, error_body(err.to_string())),
        SagaError::QuotationNotApproved(_)
        | SagaError::Compensated { .. }
        | SagaError::EventStore(EventStoreError::ConcurrencyConflict { .. }) => {
            (StatusCode::CONFLICT, error_body(err.to_string()))
        }
        SagaError::MissingPrice { .. } | SagaError::UnknownLine | SagaError::TotalMismatch { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, error_body(err.to_string()))
        }
        SagaError::EventStore(_) | SagaError::Serialization(_) => internal(&err),
    }
}

fn tracking_error_to_response(err: TrackingError) -> (StatusCode, serde_json::Value) {
    let message: Localized = err.message();
    let status = match err {
        TrackingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TrackingError::NotFound { .. } => StatusCode::NOT_FOUND,
    };
    (
        status,
        serde_json::json!({ "error": message.en, "message": message }),
    )
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        ApiError::Saga(err)
    }
}

impl From<TrackingError> for ApiError {
    fn from(err: TrackingError) -> Self {
        ApiError::Tracking(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        ApiError::Projection(err)
    }
}
