//! Category editing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::OwnerId,
    category::{Category, CategoryName, CategoryUpdate, get_category, update_category_row},
    consistency::{CategoryChange, ensure_not_default, ensure_unique_name},
    database_id::CategoryId,
    extract::{ApiJson, ApiPath, non_blank},
    response::ApiResponse,
};

/// The state needed for editing a category.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for editing a category. Blank fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl TryFrom<UpdateCategoryRequest> for CategoryUpdate {
    type Error = Error;

    fn try_from(request: UpdateCategoryRequest) -> Result<Self, Self::Error> {
        let name = non_blank(request.name)
            .map(|name| CategoryName::new(&name))
            .transpose()?;

        Ok(CategoryUpdate {
            name,
            icon: non_blank(request.icon),
            color: non_blank(request.color),
        })
    }
}

/// Apply `update` to one of the owner's custom categories.
///
/// Transactions that refer to the old name keep it.
///
/// # Errors
/// Returns:
/// - [Error::CategoryNotFound] if the owner has no category with `category_id`,
/// - [Error::EditDefaultCategory] if the category is a default category,
/// - [Error::DuplicateCategory] if the new name is already taken.
pub fn update_category(
    owner_id: OwnerId,
    category_id: CategoryId,
    update: CategoryUpdate,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Category, Error> {
    let mut category = get_category(owner_id, category_id, connection)?;
    ensure_not_default(&category, CategoryChange::Edit)?;

    if let Some(name) = update.name {
        if name != category.name {
            ensure_unique_name(owner_id, &name, category.kind, Some(category.id), connection)?;
        }

        category.name = name;
    }

    if let Some(icon) = update.icon {
        category.icon = icon;
    }

    if let Some(color) = update.color {
        category.color = color;
    }

    category.updated_at = now;
    update_category_row(owner_id, &category, connection)?;

    Ok(category)
}

/// A route handler for editing a category.
pub async fn update_category_endpoint(
    State(state): State<EditCategoryState>,
    Extension(owner_id): Extension<OwnerId>,
    ApiPath(category_id): ApiPath<CategoryId>,
    ApiJson(request): ApiJson<UpdateCategoryRequest>,
) -> Result<ApiResponse<Category>, Error> {
    let update = CategoryUpdate::try_from(request)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = update_category(
        owner_id,
        category_id,
        update,
        OffsetDateTime::now_utc(),
        &connection,
    )?;

    Ok(ApiResponse::ok(category).with_message("Category updated successfully"))
}
