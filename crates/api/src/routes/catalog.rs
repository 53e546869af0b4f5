//! Catalog endpoints for the storefront and the admin product list.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use domain::{Category, Product};
use event_store::EventStore;
use serde::Deserialize;

use crate::auth::RequireAdmin;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
}

/// GET /categories
pub async fn categories<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.catalog.active_categories().await?))
}

/// GET /products?category=slug
#[tracing::instrument(skip(state))]
pub async fn products<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let category = filter.category.as_deref().filter(|c| !c.is_empty());
    Ok(Json(state.catalog.active_products(category).await?))
}

/// GET /products/featured
pub async fn featured<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.catalog.featured_products().await?))
}

/// GET /products/{slug}
pub async fn product<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(slug): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .catalog
        .product_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Product {slug} not found")))
}

/// GET /admin/products (inactive products included)
pub async fn admin_products<S: EventStore + Clone + 'static>(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.catalog.all_products().await?))
}
