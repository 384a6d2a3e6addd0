//! Time windowed statistics over an owner's transactions.

mod aggregation;
mod category_stats;
mod summary;

pub use category_stats::get_category_stats_endpoint;
pub use summary::{WindowQuery, get_dashboard_stats_endpoint};
