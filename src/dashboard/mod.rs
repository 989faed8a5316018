//! The dashboard: the expense form, the expense listing, and the category
//! totals chart.

mod aggregation;
mod charts;
mod handlers;

pub use handlers::{DashboardState, get_dashboard_page, post_create_expense};
