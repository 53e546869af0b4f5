//! Admin dashboard figures, derived from the quotations and orders views.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::read_model::ReadModel;

use super::{OrderSummary, OrdersView, QuotationSummary, QuotationsView};

/// How many recent records the dashboard lists.
const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_quotations: usize,
    pub total_orders: usize,
    /// Keyed by status wire name, e.g. `"requested"`.
    pub quotations_by_status: BTreeMap<&'static str, usize>,
    pub orders_by_status: BTreeMap<&'static str, usize>,
    pub recent_quotations: Vec<QuotationSummary>,
    pub recent_orders: Vec<OrderSummary>,
}

/// Reads through to the underlying views; holds no state of its own, so it
/// is always as fresh as they are.
#[derive(Clone)]
pub struct DashboardView {
    quotations: QuotationsView,
    orders: OrdersView,
}

impl DashboardView {
    pub fn new(quotations: QuotationsView, orders: OrdersView) -> Self {
        Self { quotations, orders }
    }

    pub async fn stats(&self) -> DashboardStats {
        let quotations_by_status = self
            .quotations
            .count_by_status()
            .await
            .into_iter()
            .map(|(status, n)| (status.as_str(), n))
            .collect();
        let orders_by_status = self
            .orders
            .count_by_status()
            .await
            .into_iter()
            .map(|(status, n)| (status.as_str(), n))
            .collect();

        DashboardStats {
            total_quotations: self.quotations.total().await,
            total_orders: self.orders.total().await,
            quotations_by_status,
            orders_by_status,
            recent_quotations: self.quotations.recent(RECENT_LIMIT).await,
            recent_orders: self.orders.recent(RECENT_LIMIT).await,
        }
    }
}

impl ReadModel for DashboardView {
    fn name(&self) -> &'static str {
        "DashboardView"
    }

    fn count(&self) -> usize {
        ReadModel::count(&self.quotations) + ReadModel::count(&self.orders)
    }
}
