//! Transaction creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    AppState, Error,
    auth::OwnerId,
    consistency::ensure_category_for_type,
    entry_type::EntryType,
    extract::{ApiJson, non_blank},
    money::RawAmount,
    response::ApiResponse,
    timezone::resolve_timezone,
    transaction::{Transaction, TransactionBuilder, insert_transaction, parse_description},
    window::{Bound, parse_instant},
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<RawAmount>,
    pub category: Option<String>,
    pub description: Option<String>,
    /// An RFC 3339 date-time, or a date that is read as midnight in the local timezone.
    pub date: Option<String>,
}

impl CreateTransactionRequest {
    /// Check the request fields and convert them into a [TransactionBuilder].
    ///
    /// # Errors
    /// Returns an [Error::Validation] if a required field is missing or any field is malformed.
    pub fn validate(self, local_timezone: &Tz) -> Result<TransactionBuilder, Error> {
        let (Some(kind), Some(amount), Some(category)) = (
            non_blank(self.kind),
            self.amount,
            non_blank(self.category),
        ) else {
            return Err(Error::validation(
                "Type, amount, and category are required",
            ));
        };

        let kind: EntryType = kind.parse()?;
        let amount = amount.to_money()?;
        let description = match self.description {
            Some(text) => parse_description(&text)?,
            None => None,
        };

        let mut builder = Transaction::build(kind, amount, &category).description(description);

        if let Some(date) = non_blank(self.date) {
            builder = builder.date(parse_instant(&date, Bound::Start, local_timezone)?);
        }

        Ok(builder)
    }
}

/// Store a transaction after checking that its category exists for its type.
///
/// # Errors
/// Returns [Error::InvalidCategoryForType] if the owner has no category with
/// the transaction's category name and type.
pub fn create_transaction(
    owner_id: OwnerId,
    builder: &TransactionBuilder,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    ensure_category_for_type(owner_id, &builder.category, builder.kind, connection)?;

    insert_transaction(owner_id, builder, now, connection)
}

/// A route handler for creating a new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(owner_id): Extension<OwnerId>,
    ApiJson(request): ApiJson<CreateTransactionRequest>,
) -> Result<(StatusCode, ApiResponse<Transaction>), Error> {
    let local_timezone = resolve_timezone(&state.local_timezone)?;
    let builder = request.validate(local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(owner_id, &builder, OffsetDateTime::now_utc(), &connection)?;

    Ok((StatusCode::CREATED, ApiResponse::ok(transaction)))
}
