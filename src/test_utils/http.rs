use axum::{
    body::{Body, to_bytes},
    http::StatusCode,
    response::Response,
};
use jsonwebtoken::EncodingKey;
use rusqlite::Connection;
use serde_json::Value;
use time::{Duration, OffsetDateTime};

use crate::{
    AppState,
    auth::{OwnerId, encode_token},
    pagination::PaginationConfig,
};

pub(crate) const TEST_SECRET: &str = "averysecretsecret";

pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(
        connection,
        TEST_SECRET,
        "Etc/UTC",
        PaginationConfig::default(),
    )
    .expect("Could not create app state")
}

#[track_caller]
pub(crate) fn make_token(owner_id: i64) -> String {
    encode_token(
        OwnerId::new(owner_id),
        OffsetDateTime::now_utc(),
        Duration::hours(1),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Could not create token")
}

pub(crate) async fn parse_json_body(response: Response<Body>) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not valid JSON")
}

#[track_caller]
pub(crate) fn assert_status(response: &Response<Body>, want: StatusCode) {
    assert_eq!(response.status(), want, "unexpected status code");
}

#[track_caller]
pub(crate) fn assert_message(body: &Value, want: &str) {
    assert_eq!(body["message"], want, "unexpected message in {body}");
}
