//! The category breakdown: how much of the window's income or expenses went to each category.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::OwnerId,
    dashboard::{WindowQuery, aggregation::totals_by_category},
    entry_type::EntryType,
    extract::{ApiQuery, non_blank},
    money::{Money, Percentage},
    response::ApiResponse,
    window::Window,
};

/// One category's share of the window total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStat {
    pub category: String,
    pub amount: Money,
    pub count: u64,
    pub percentage: Percentage,
}

/// The breakdown of one type of transaction by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Sorted by amount, largest first, then by category name.
    pub categories: Vec<CategoryStat>,
    pub total: Money,
    pub period: Window,
}

/// Break down the owner's transactions of `kind` in `window` by category.
///
/// Percentages are rounded to two decimal places and are all zero when the total is zero.
pub fn category_stats(
    owner_id: OwnerId,
    kind: EntryType,
    window: Window,
    connection: &Connection,
) -> Result<CategoryStats, Error> {
    let totals = totals_by_category(owner_id, kind, &window, connection)?;
    let total: Money = totals.iter().map(|category| category.amount).sum();

    let categories = totals
        .into_iter()
        .map(|category| CategoryStat {
            percentage: Percentage::of(category.amount, total),
            category: category.category,
            amount: category.amount,
            count: category.count,
        })
        .collect();

    Ok(CategoryStats {
        categories,
        total,
        period: window,
    })
}

/// The state needed for the category breakdown.
#[derive(Debug, Clone)]
pub struct CategoryStatsState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryStatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the category breakdown. `type` defaults to expense.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub window: WindowQuery,
}

/// A route handler for the category breakdown.
pub async fn get_category_stats_endpoint(
    State(state): State<CategoryStatsState>,
    Extension(owner_id): Extension<OwnerId>,
    ApiQuery(query): ApiQuery<CategoryStatsQuery>,
) -> Result<ApiResponse<CategoryStats>, Error> {
    let kind = match non_blank(query.kind) {
        Some(kind) => kind.parse()?,
        None => EntryType::Expense,
    };
    let window = query
        .window
        .window(OffsetDateTime::now_utc(), &state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    category_stats(owner_id, kind, window, &connection).map(ApiResponse::ok)
}
