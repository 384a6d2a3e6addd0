//! The JSON envelopes that successful responses are wrapped in.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A successful response carrying `data`, e.g. `{"success": true, "data": {...}}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    /// Wrap `data` in a success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Attach a human readable message to the response.
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// A successful response with only a message, e.g. after deleting something.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    success: bool,
    message: &'static str,
}

impl ApiMessage {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

impl IntoResponse for ApiMessage {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// One page of a larger result set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    success: bool,
    data: Vec<T>,
    total: u64,
    has_more: bool,
}

impl<T> PageResponse<T> {
    pub fn new(data: Vec<T>, total: u64, has_more: bool) -> Self {
        Self {
            success: true,
            data,
            total,
            has_more,
        }
    }
}

impl<T: Serialize> IntoResponse for PageResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
