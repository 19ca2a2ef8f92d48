//! Response helpers.
//!
//! # Responsibilities
//! - Build plain responses with a status, content type and body
//! - Serialize values to JSON, degrading to a 500 on failure
//! - Serve a single file from disk
//!
//! # Design Decisions
//! - Error bodies are the canonical reason phrase as `text/plain`
//! - Helpers never panic; bad inputs degrade to error responses

use std::path::Path;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Builds a response with the given content type, status and body.
pub fn respond(content_type: &str, status: StatusCode, body: impl Into<Body>) -> Response {
    let content_type = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    response
}

/// Plain-text error response carrying the status's reason phrase.
pub fn error(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    respond("text/plain", status, reason)
}

/// Serializes `value` as a JSON response.
///
/// Falls back to a plain-text 500 when serialization fails.
pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(data) => respond("application/json", status, data),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize JSON response");
            error(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Serves the file at `path`, honouring conditional and range headers.
pub async fn serve_file(req: Request, path: impl AsRef<Path>) -> Response {
    match ServeFile::new(path).oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(e) => match e {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde::ser::Error as _;
    use std::collections::BTreeMap;

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not serializable"))
        }
    }

    #[tokio::test]
    async fn test_respond_sets_headers() {
        let response = respond("text/html", StatusCode::CREATED, "<p>hi</p>");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(body_string(response).await, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_error_body_is_reason_phrase() {
        let response = error(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body_string(response).await, "Method Not Allowed");
    }

    #[tokio::test]
    async fn test_json() {
        let mut value = BTreeMap::new();
        value.insert("a", "1");
        let response = json(StatusCode::OK, &value);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_string(response).await, r#"{"a":"1"}"#);
    }

    #[tokio::test]
    async fn test_json_failure_is_500() {
        let response = json(StatusCode::OK, &Unserializable);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body_string(response).await, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_serve_missing_file_is_404() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = serve_file(req, "does/not/exist.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
