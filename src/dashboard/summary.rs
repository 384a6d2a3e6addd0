//! The dashboard summary: income and expense totals, balance and recent transactions.

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
    dashboard::aggregation::totals_by_type,
    extract::{ApiQuery, non_blank},
    money::Money,
    response::ApiResponse,
    timezone::resolve_timezone,
    transaction::{Transaction, TransactionFilter, query_transactions},
    window::Window,
};

/// How many of the latest transactions the dashboard shows.
pub const RECENT_TRANSACTION_LIMIT: u64 = 10;

/// Totals for the owner's transactions in a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub income: Money,
    pub income_count: u64,
    pub expense: Money,
    pub expense_count: u64,
    /// Income minus expenses. Negative when more was spent than earned.
    pub balance: Money,
    /// The latest transactions in the window, newest first.
    pub recent_transactions: Vec<Transaction>,
    pub period: Window,
}

/// Summarise the owner's transactions in `window`.
pub fn dashboard_stats(
    owner_id: OwnerId,
    window: Window,
    connection: &Connection,
) -> Result<DashboardStats, Error> {
    let totals = totals_by_type(owner_id, &window, connection)?;

    let filter = TransactionFilter {
        start: Some(window.start),
        end: Some(window.end),
        ..Default::default()
    };
    let recent_transactions =
        query_transactions(owner_id, &filter, RECENT_TRANSACTION_LIMIT, 0, connection)?;

    Ok(DashboardStats {
        income: totals.income,
        income_count: totals.income_count,
        expense: totals.expense,
        expense_count: totals.expense_count,
        balance: totals.income - totals.expense,
        recent_transactions,
        period: window,
    })
}

/// The state needed for the dashboard summary.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The optional window bounds for the dashboard.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl WindowQuery {
    /// Resolve the window, defaulting to the start of the current local month until `now`.
    pub fn window(&self, now: OffsetDateTime, local_timezone: &str) -> Result<Window, Error> {
        let timezone = resolve_timezone(local_timezone)?;

        Window::from_params(
            non_blank(self.start_date.clone()).as_deref(),
            non_blank(self.end_date.clone()).as_deref(),
            now,
            timezone,
        )
    }
}

/// A route handler for the dashboard summary.
pub async fn get_dashboard_stats_endpoint(
    State(state): State<DashboardState>,
    Extension(owner_id): Extension<OwnerId>,
    ApiQuery(query): ApiQuery<WindowQuery>,
) -> Result<ApiResponse<DashboardStats>, Error> {
    let window = query.window(OffsetDateTime::now_utc(), &state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    dashboard_stats(owner_id, window, &connection).map(ApiResponse::ok)
}
