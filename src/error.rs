//! Defines the app level error type and its conversion into JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::entry_type::EntryType;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent missing or malformed input.
    ///
    /// The message is shown to the client as-is.
    #[error("{0}")]
    Validation(String),

    /// The category named on a transaction does not exist for the owner with
    /// the transaction's type.
    #[error("Invalid category for the specified type")]
    InvalidCategoryForType,

    /// A category with the same name (ignoring case) and type already exists
    /// for the owner.
    #[error("Category \"{name}\" already exists for {kind}")]
    DuplicateCategory {
        /// The rejected category name.
        name: String,
        /// The type shared by both categories.
        kind: EntryType,
    },

    /// The category is still referenced by `count` transactions and cannot be
    /// deleted.
    #[error("Cannot delete category. It is used in {count} transaction(s)")]
    CategoryInUse {
        /// The number of transactions that reference the category.
        count: u64,
    },

    /// Default categories cannot be edited.
    #[error("Cannot edit default categories")]
    EditDefaultCategory,

    /// Default categories cannot be deleted.
    #[error("Cannot delete default categories")]
    DeleteDefaultCategory,

    /// The category does not exist or belongs to another owner.
    #[error("Category not found")]
    CategoryNotFound,

    /// The transaction does not exist or belongs to another owner.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// No route matched the request.
    #[error("Route not found")]
    RouteNotFound,

    /// The route exists but does not accept the request's method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The request did not include a bearer token.
    #[error("Not authorized, no token")]
    MissingToken,

    /// The bearer token could not be verified or has expired.
    #[error("Not authorized, token failed")]
    InvalidToken,

    /// A bearer token could not be signed.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// Internally, this error may occur when a query returns no rows. Callers
    /// should map it to the not found error for the entity they queried.
    #[error("the requested row could not be found")]
    NoRows,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl Error {
    /// The HTTP status code the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::InvalidCategoryForType
            | Error::CategoryInUse { .. } => StatusCode::BAD_REQUEST,
            Error::DuplicateCategory { .. } => StatusCode::CONFLICT,
            Error::EditDefaultCategory | Error::DeleteDefaultCategory => StatusCode::FORBIDDEN,
            Error::CategoryNotFound | Error::TransactionNotFound | Error::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::MissingToken | Error::InvalidToken => StatusCode::UNAUTHORIZED,
            Error::TokenCreation(_)
            | Error::NoRows
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezone(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Shorthand for creating a [Error::Validation].
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NoRows,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Any errors that are not handled above are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
