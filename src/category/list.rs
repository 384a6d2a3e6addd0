//! Category listing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::OwnerId,
    category::{Category, get_all_categories, seed_default_categories},
    response::ApiResponse,
};

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct ListCategoriesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListCategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get all of an owner's categories, sorted by type and then name.
///
/// An owner without any categories gets the default set first.
pub fn list_categories(
    owner_id: OwnerId,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    seed_default_categories(owner_id, now, connection)?;
    get_all_categories(owner_id, connection)
}

/// A route handler that returns the owner's categories.
pub async fn list_categories_endpoint(
    State(state): State<ListCategoriesState>,
    Extension(owner_id): Extension<OwnerId>,
) -> Result<ApiResponse<Vec<Category>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    list_categories(owner_id, OffsetDateTime::now_utc(), &connection).map(ApiResponse::ok)
}
