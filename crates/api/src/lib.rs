//! HTTP API for the namkeen storefront and its admin panel.
//!
//! Public routes serve the catalog, accept quotation requests and answer
//! tracking lookups. Routes under `/admin` require the configured bearer
//! token. Structured logging comes from `tracing` and Prometheus metrics are
//! exposed at `/metrics`.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod seed;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::Catalog;
use event_store::{EventStore, NumberSequence};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use auth::{AdminToken, RequireAdmin};
pub use config::{Config, LogFormat};
pub use error::ApiError;
pub use seed::demo_catalog;
pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: EventStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let storefront = Router::new()
        .route("/categories", get(routes::catalog::categories::<S>))
        .route("/products", get(routes::catalog::products::<S>))
        .route("/products/featured", get(routes::catalog::featured::<S>))
        .route("/products/{slug}", get(routes::catalog::product::<S>))
        .route("/quotations", post(routes::quotations::submit::<S>))
        .route("/track", post(routes::tracking::track::<S>));

    let admin = Router::new()
        .route("/admin/dashboard", get(routes::dashboard::get::<S>))
        .route("/admin/products", get(routes::catalog::admin_products::<S>))
        .route("/admin/quotations", get(routes::quotations::list::<S>))
        .route("/admin/quotations/{id}", get(routes::quotations::get::<S>))
        .route(
            "/admin/quotations/{id}/approve",
            post(routes::quotations::approve::<S>),
        )
        .route(
            "/admin/quotations/{id}/reject",
            post(routes::quotations::reject::<S>),
        )
        .route(
            "/admin/quotations/{id}/convert",
            post(routes::quotations::convert::<S>),
        )
        .route("/admin/sagas/{id}", get(routes::sagas::get::<S>))
        .route("/admin/orders", get(routes::orders::list::<S>))
        .route("/admin/orders/{id}", get(routes::orders::get::<S>))
        .route(
            "/admin/orders/{id}/dispatch",
            post(routes::orders::dispatch::<S>),
        )
        .route("/admin/orders/{id}/deliver", post(routes::orders::deliver::<S>))
        .route("/admin/orders/{id}/cancel", post(routes::orders::cancel::<S>))
        .route("/admin/orders/{id}/payment", post(routes::orders::payment::<S>));

    Router::new()
        .route("/health", get(routes::health::check))
        .merge(storefront)
        .merge(admin)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over an event store and number sequence.
pub fn create_default_state<S: EventStore + Clone + 'static>(
    event_store: S,
    numbers: Arc<dyn NumberSequence>,
    catalog: Arc<dyn Catalog>,
    admin_token: Option<String>,
) -> Arc<AppState<S>> {
    Arc::new(AppState::new(
        event_store,
        numbers,
        catalog,
        AdminToken::new(admin_token),
    ))
}
