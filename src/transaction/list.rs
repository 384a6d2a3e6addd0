//! Transaction listing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time_tz::Tz;

use crate::{
    AppState, Error,
    auth::OwnerId,
    entry_type::EntryType,
    extract::{ApiQuery, non_blank},
    pagination::{Page, PaginationConfig, has_more},
    response::PageResponse,
    timezone::resolve_timezone,
    transaction::{Transaction, TransactionFilter, count_transactions, query_transactions},
    window::{Bound, parse_instant},
};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub pagination_config: PaginationConfig,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
}

impl ListTransactionsQuery {
    /// Convert the query parameters into a filter. Blank parameters are ignored.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if the type or either date is malformed,
    /// or if the start date is after the end date.
    pub fn filter(&self, local_timezone: &Tz) -> Result<TransactionFilter, Error> {
        let kind = non_blank(self.kind.clone())
            .map(|kind| kind.parse::<EntryType>())
            .transpose()?;
        let start = non_blank(self.start_date.clone())
            .map(|text| parse_instant(&text, Bound::Start, local_timezone))
            .transpose()?;
        let end = non_blank(self.end_date.clone())
            .map(|text| parse_instant(&text, Bound::End, local_timezone))
            .transpose()?;

        if matches!((start, end), (Some(start), Some(end)) if start > end) {
            return Err(Error::validation("startDate must not be after endDate"));
        }

        Ok(TransactionFilter {
            kind,
            category: non_blank(self.category.clone()),
            start,
            end,
        })
    }
}

/// One page of an owner's transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPage {
    /// The transactions on this page, newest first.
    pub transactions: Vec<Transaction>,
    /// The number of transactions matching the filter across all pages.
    pub total: u64,
    /// Whether there are matching transactions after this page.
    pub has_more: bool,
}

/// Get one page of the owner's transactions that match `filter`.
pub fn list_transactions(
    owner_id: OwnerId,
    filter: &TransactionFilter,
    page: Page,
    connection: &Connection,
) -> Result<TransactionPage, Error> {
    let transactions = query_transactions(owner_id, filter, page.limit, page.skip, connection)?;
    let total = count_transactions(owner_id, filter, connection)?;
    let has_more = has_more(total, page.skip, transactions.len() as u64);

    Ok(TransactionPage {
        transactions,
        total,
        has_more,
    })
}

/// A route handler that returns a page of the owner's transactions.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Extension(owner_id): Extension<OwnerId>,
    ApiQuery(query): ApiQuery<ListTransactionsQuery>,
) -> Result<PageResponse<Transaction>, Error> {
    let local_timezone = resolve_timezone(&state.local_timezone)?;
    let filter = query.filter(local_timezone)?;
    let page = state.pagination_config.page(query.limit, query.skip)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let TransactionPage {
        transactions,
        total,
        has_more,
    } = list_transactions(owner_id, &filter, page, &connection)?;

    Ok(PageResponse::new(transactions, total, has_more))
}
