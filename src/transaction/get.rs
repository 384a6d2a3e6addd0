//! Endpoint for fetching a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::OwnerId,
    database_id::TransactionId,
    extract::ApiPath,
    response::ApiResponse,
    transaction::{Transaction, get_transaction},
};

/// The state needed to get a transaction.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for getting a transaction by its database ID.
///
/// Transactions of other owners are reported as not found.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    Extension(owner_id): Extension<OwnerId>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<ApiResponse<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction(owner_id, transaction_id, &connection).map(ApiResponse::ok)
}

#[cfg(test)]
mod get_transaction_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use time::OffsetDateTime;

    use crate::{
        auth::OwnerId,
        entry_type::EntryType,
        extract::ApiPath,
        money::Money,
        test_utils::{assert_message, assert_status, get_test_connection, parse_json_body},
        transaction::{Transaction, insert_transaction},
    };

    use super::{GetTransactionState, get_transaction_endpoint};

    const OWNER: OwnerId = OwnerId::new(1);

    fn get_state() -> (GetTransactionState, Transaction) {
        let connection = get_test_connection();
        let transaction = insert_transaction(
            OWNER,
            &Transaction::build(EntryType::Income, Money::from_cents(12345), "Salary"),
            OffsetDateTime::now_utc(),
            &connection,
        )
        .unwrap();

        (
            GetTransactionState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            transaction,
        )
    }

    #[tokio::test]
    async fn returns_own_transaction() {
        let (state, transaction) = get_state();

        let response =
            get_transaction_endpoint(State(state), Extension(OWNER), ApiPath(transaction.id))
                .await
                .into_response();

        assert_status(&response, StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["data"]["id"], transaction.id);
        assert_eq!(body["data"]["amount"], 123.45);
    }

    #[tokio::test]
    async fn other_owners_transaction_is_not_found() {
        let (state, transaction) = get_state();

        let response = get_transaction_endpoint(
            State(state),
            Extension(OwnerId::new(2)),
            ApiPath(transaction.id),
        )
        .await
        .into_response();

        assert_status(&response, StatusCode::NOT_FOUND);
        let body = parse_json_body(response).await;
        assert_message(&body, "Transaction not found");
    }
}
