//! Transaction editing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    AppState, Error,
    auth::OwnerId,
    consistency::ensure_category_for_type,
    database_id::TransactionId,
    entry_type::EntryType,
    extract::{ApiJson, ApiPath, non_blank},
    money::RawAmount,
    response::ApiResponse,
    timezone::resolve_timezone,
    transaction::{
        Transaction, TransactionUpdate, get_transaction, parse_description, update_transaction_row,
    },
    window::{Bound, parse_instant},
};

/// The state needed for editing a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for editing a transaction.
///
/// Missing or blank fields are left unchanged, except `description`: an
/// explicit `null` or blank string clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<RawAmount>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub date: Option<String>,
}

/// Distinguish a field set to `null` (`Some(None)`) from a missing field (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateTransactionRequest {
    /// Check the supplied fields and convert them into a [TransactionUpdate].
    ///
    /// # Errors
    /// Returns an [Error::Validation] if any supplied field is malformed.
    pub fn validate(self, local_timezone: &Tz) -> Result<TransactionUpdate, Error> {
        let kind = non_blank(self.kind)
            .map(|kind| kind.parse::<EntryType>())
            .transpose()?;
        let amount = self
            .amount
            .map(|amount| amount.to_money())
            .transpose()?;
        let description = match self.description {
            Some(Some(text)) => Some(parse_description(&text)?),
            Some(None) => Some(None),
            None => None,
        };
        let date = non_blank(self.date)
            .map(|date| parse_instant(&date, Bound::Start, local_timezone))
            .transpose()?;

        Ok(TransactionUpdate {
            kind,
            amount,
            category: non_blank(self.category),
            description,
            date,
        })
    }
}

/// Apply `update` to one of the owner's transactions.
///
/// The category is only checked against the type when the update sets both.
///
/// # Errors
/// Returns:
/// - [Error::TransactionNotFound] if the owner has no transaction with `transaction_id`,
/// - [Error::InvalidCategoryForType] if the new category does not exist for the new type.
pub fn update_transaction(
    owner_id: OwnerId,
    transaction_id: TransactionId,
    update: TransactionUpdate,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut transaction = get_transaction(owner_id, transaction_id, connection)?;

    if let (Some(kind), Some(category)) = (update.kind, &update.category) {
        ensure_category_for_type(owner_id, category, kind, connection)?;
    }

    if let Some(kind) = update.kind {
        transaction.kind = kind;
    }

    if let Some(amount) = update.amount {
        transaction.amount = amount;
    }

    if let Some(category) = update.category {
        transaction.category = category;
    }

    if let Some(description) = update.description {
        transaction.description = description;
    }

    if let Some(date) = update.date {
        transaction.date = date;
    }

    transaction.updated_at = now;
    update_transaction_row(owner_id, &transaction, connection)?;

    Ok(transaction)
}

/// A route handler for editing a transaction.
pub async fn update_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(owner_id): Extension<OwnerId>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
    ApiJson(request): ApiJson<UpdateTransactionRequest>,
) -> Result<ApiResponse<Transaction>, Error> {
    let local_timezone = resolve_timezone(&state.local_timezone)?;
    let update = request.validate(local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_transaction(
        owner_id,
        transaction_id,
        update,
        OffsetDateTime::now_utc(),
        &connection,
    )
    .map(ApiResponse::ok)
}
