//! Read models and the tracking lookup for the storefront.
//!
//! - [`Projection`] trait for processing events into read models
//! - [`ProjectionProcessor`] for feeding events from the store to projections
//! - [`QuotationsView`] and [`OrdersView`] for the admin panel
//! - [`DashboardView`] summarising both
//! - [`TrackingLookup`] answering customer "where is my order" queries

pub mod error;
pub mod processor;
pub mod projection;
pub mod read_model;
pub mod tracking;
pub mod views;

pub use error::{ProjectionError, Result};
pub use processor::ProjectionProcessor;
pub use projection::{Projection, ProjectionPosition};
pub use read_model::ReadModel;
pub use tracking::{TrackedDocument, TrackingError, TrackingLookup};
pub use views::{
    DashboardStats, DashboardView, OrderSummary, OrdersView, QuotationSummary, QuotationsView,
};
