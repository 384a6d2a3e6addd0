//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::OwnerId,
    category::{Category, CategoryName, NewCategory, insert_category},
    consistency::ensure_unique_name,
    entry_type::EntryType,
    extract::{ApiJson, non_blank},
    response::ApiResponse,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a category.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TryFrom<CreateCategoryRequest> for NewCategory {
    type Error = Error;

    fn try_from(request: CreateCategoryRequest) -> Result<Self, Self::Error> {
        let (Some(name), Some(icon), Some(color), Some(kind)) = (
            non_blank(request.name),
            non_blank(request.icon),
            non_blank(request.color),
            non_blank(request.kind),
        ) else {
            return Err(Error::validation(
                "Please provide name, icon, color, and type",
            ));
        };

        Ok(NewCategory {
            name: CategoryName::new(&name)?,
            icon,
            color,
            kind: kind.parse::<EntryType>()?,
        })
    }
}

/// Create a custom category for an owner.
///
/// # Errors
/// Returns [Error::DuplicateCategory] if the owner already has a category of
/// the same type with the same name, ignoring case.
pub fn create_category(
    owner_id: OwnerId,
    new_category: &NewCategory,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Category, Error> {
    ensure_unique_name(
        owner_id,
        &new_category.name,
        new_category.kind,
        None,
        connection,
    )?;

    insert_category(owner_id, new_category, false, now, connection)
}

/// A route handler for creating a new category.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    Extension(owner_id): Extension<OwnerId>,
    ApiJson(request): ApiJson<CreateCategoryRequest>,
) -> Result<(StatusCode, ApiResponse<Category>), Error> {
    let new_category = NewCategory::try_from(request)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = create_category(owner_id, &new_category, OffsetDateTime::now_utc(), &connection)?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(category).with_message("Category created successfully"),
    ))
}
