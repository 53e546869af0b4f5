//! Read model views for the query side.

pub mod dashboard;
pub mod orders;
pub mod quotations;

pub use dashboard::{DashboardStats, DashboardView};
pub use orders::{OrderSummary, OrdersView};
pub use quotations::{QuotationSummary, QuotationsView};
