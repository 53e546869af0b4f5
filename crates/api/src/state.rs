//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;
use domain::{Catalog, OrderService, QuotationService};
use event_store::{EventStore, NumberSequence};
use projections::{
    DashboardView, OrdersView, Projection, ProjectionProcessor, QuotationsView, TrackingLookup,
};
use saga::ConversionCoordinator;

use crate::auth::AdminToken;
use crate::error::ApiError;

/// Services, read models and settings shared by every handler.
pub struct AppState<S: EventStore> {
    pub quotation_service: QuotationService<S>,
    pub order_service: OrderService<S>,
    pub conversion: ConversionCoordinator<S>,
    pub catalog: Arc<dyn Catalog>,
    pub quotations: QuotationsView,
    pub orders: OrdersView,
    pub dashboard: DashboardView,
    pub tracking: TrackingLookup,
    pub projection_processor: Arc<ProjectionProcessor<S>>,
    pub admin_token: AdminToken,
}

impl<S: EventStore + Clone + 'static> AppState<S> {
    /// Wires services and read models over one store and number sequence.
    pub fn new(
        event_store: S,
        numbers: Arc<dyn NumberSequence>,
        catalog: Arc<dyn Catalog>,
        admin_token: AdminToken,
    ) -> Self {
        let quotations = QuotationsView::new();
        let orders = OrdersView::new();

        let mut processor = ProjectionProcessor::new(event_store.clone());
        processor.register(Box::new(quotations.clone()) as Box<dyn Projection>);
        processor.register(Box::new(orders.clone()) as Box<dyn Projection>);

        Self {
            quotation_service: QuotationService::new(event_store.clone(), numbers.clone()),
            order_service: OrderService::new(event_store.clone(), numbers.clone()),
            conversion: ConversionCoordinator::new(event_store, numbers),
            catalog,
            dashboard: DashboardView::new(quotations.clone(), orders.clone()),
            tracking: TrackingLookup::new(quotations.clone(), orders.clone()),
            quotations,
            orders,
            projection_processor: Arc::new(processor),
            admin_token,
        }
    }

    /// Brings the read models up to date with the store.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.projection_processor.run_catch_up().await?;
        Ok(())
    }
}

impl<S: EventStore> FromRef<Arc<AppState<S>>> for AdminToken {
    fn from_ref(state: &Arc<AppState<S>>) -> Self {
        state.admin_token.clone()
    }
}
