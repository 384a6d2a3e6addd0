//! The fallbacks for requests that match no route or no method of a route.

use axum::response::{IntoResponse, Response};

use crate::Error;

/// Respond with a JSON 404 error.
pub async fn get_404_not_found() -> Response {
    Error::RouteNotFound.into_response()
}

/// Respond with a JSON 405 error.
pub async fn get_405_method_not_allowed() -> Response {
    Error::MethodNotAllowed.into_response()
}
