//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::OwnerId,
    category::{delete_category_row, get_category},
    consistency::{CategoryChange, ensure_not_default, ensure_unreferenced},
    database_id::CategoryId,
    extract::ApiPath,
    response::ApiMessage,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete one of the owner's custom categories.
///
/// # Errors
/// Returns:
/// - [Error::CategoryNotFound] if the owner has no category with `category_id`,
/// - [Error::DeleteDefaultCategory] if the category is a default category,
/// - [Error::CategoryInUse] if any of the owner's transactions use the category's name.
pub fn delete_category(
    owner_id: OwnerId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let category = get_category(owner_id, category_id, connection)?;
    ensure_not_default(&category, CategoryChange::Delete)?;
    ensure_unreferenced(owner_id, &category, connection)?;

    delete_category_row(owner_id, category_id, connection)
}

/// A route handler for deleting a category.
pub async fn delete_category_endpoint(
    State(state): State<DeleteCategoryState>,
    Extension(owner_id): Extension<OwnerId>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<ApiMessage, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_category(owner_id, category_id, &connection)?;

    Ok(ApiMessage::new("Category deleted successfully"))
}

#[cfg(test)]
mod delete_category_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use time::OffsetDateTime;

    use crate::{
        Error,
        auth::OwnerId,
        category::{get_all_categories, get_category, seed_default_categories},
        entry_type::EntryType,
        extract::ApiPath,
        money::Money,
        test_utils::{assert_message, assert_status, get_test_connection, parse_json_body, seed_category},
        transaction::{Transaction, insert_transaction},
    };

    use super::{DeleteCategoryState, delete_category, delete_category_endpoint};

    const OWNER: OwnerId = OwnerId::new(1);

    #[test]
    fn deletes_unused_category() {
        let connection = get_test_connection();
        let category = seed_category(OWNER, "Pets", EntryType::Expense, &connection);

        assert_eq!(delete_category(OWNER, category.id, &connection), Ok(()));
        assert_eq!(
            get_category(OWNER, category.id, &connection),
            Err(Error::CategoryNotFound)
        );
    }

    #[test]
    fn default_category_cannot_be_deleted() {
        let connection = get_test_connection();
        seed_default_categories(OWNER, OffsetDateTime::now_utc(), &connection).unwrap();
        let default_category = get_all_categories(OWNER, &connection).unwrap().remove(0);

        assert_eq!(
            delete_category(OWNER, default_category.id, &connection),
            Err(Error::DeleteDefaultCategory)
        );
    }

    #[test]
    fn missing_category_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(
            delete_category(OWNER, 7, &connection),
            Err(Error::CategoryNotFound)
        );
    }

    #[tokio::test]
    async fn referenced_category_is_blocked_until_transactions_are_gone() {
        let connection = get_test_connection();
        let category = seed_category(OWNER, "Food", EntryType::Expense, &connection);
        let mut transaction_ids = Vec::new();
        for cents in [10000, 5000] {
            let transaction = insert_transaction(
                OWNER,
                &Transaction::build(EntryType::Expense, Money::from_cents(cents), "Food"),
                OffsetDateTime::now_utc(),
                &connection,
            )
            .unwrap();
            transaction_ids.push(transaction.id);
        }
        let state = DeleteCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            delete_category_endpoint(State(state.clone()), Extension(OWNER), ApiPath(category.id))
                .await
                .into_response();

        assert_status(&response, StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_message(
            &body,
            "Cannot delete category. It is used in 2 transaction(s)",
        );

        {
            let connection = state.db_connection.lock().unwrap();
            for id in transaction_ids {
                crate::transaction::delete_transaction(OWNER, id, &connection).unwrap();
            }
        }

        let response =
            delete_category_endpoint(State(state), Extension(OWNER), ApiPath(category.id))
                .await
                .into_response();

        assert_status(&response, StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["success"], true);
        assert_message(&body, "Category deleted successfully");
    }
}
