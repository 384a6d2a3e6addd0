//! Request extractors that report rejections as JSON validation errors.

use axum::extract::{FromRequest, FromRequestParts};

use crate::Error;

/// Like [axum::Json], but a malformed body is rejected with [Error::Validation].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Like [axum::extract::Query], but a malformed query string is rejected with [Error::Validation].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

/// Like [axum::extract::Path], but an unparsable path parameter is rejected with [Error::Validation].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

/// Treat blank text the same as a missing value.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::json;

    use super::{ApiJson, non_blank};

    #[derive(Deserialize)]
    struct Body {
        value: u32,
    }

    async fn echo(ApiJson(body): ApiJson<Body>) -> String {
        body.value.to_string()
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_validation_error() {
        let server = TestServer::try_new(Router::new().route("/", post(echo))).unwrap();

        let response = server
            .post("/")
            .content_type("application/json")
            .text("{not json")
            .await;

        response.assert_status_bad_request();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn valid_json_is_extracted() {
        let server = TestServer::try_new(Router::new().route("/", post(echo))).unwrap();

        let response = server.post("/").json(&json!({"value": 7})).await;

        response.assert_status_ok();
        response.assert_text("7");
    }

    #[test]
    fn blank_text_is_none() {
        assert_eq!(non_blank(Some("   ".to_owned())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" Food ".to_owned())), Some("Food".to_owned()));
    }
}
