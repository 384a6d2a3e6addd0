//! The REST API route paths.
//!
//! For routes that take a parameter, e.g. '/api/categories/{category_id}', use [format_endpoint].

/// Unauthenticated liveness check.
pub const HEALTH: &str = "/api/health";
/// List and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// Update and delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// List and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// Get, update and delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// Income and expense totals for a window.
pub const DASHBOARD: &str = "/api/transactions/dashboard";
/// The breakdown of income or expenses by category for a window.
pub const CATEGORY_STATS: &str = "/api/transactions/category-stats";

/// Replace the first `{parameter}` in `endpoint_path` with `id`.
///
/// If no parameter is found in `endpoint_path`, the path is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_end..]
    )
}
