//! Request helpers.
//!
//! # Responsibilities
//! - Look up a named parameter: path, then query, then urlencoded form
//! - Generate and read `x-request-id` values
//!
//! # Design Decisions
//! - Path parameters are copied into a `PathParams` extension by the
//!   dispatch adapter, so lookups need no access to the router
//! - Form bodies are buffered once and put back, so the handler can still
//!   read the body afterwards
//! - Empty values count as absent

use axum::body::{to_bytes, Body};
use axum::extract::{RawPathParams, Request};
use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Largest form body read by [`param`].
pub const FORM_LIMIT: usize = 10 * 1024 * 1024;

/// Path parameters of the matched route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub(crate) fn from_raw(raw: &RawPathParams) -> Self {
        Self(
            raw.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parsed urlencoded form body, cached on the request.
#[derive(Debug, Clone, Default)]
struct FormFields(Vec<(String, String)>);

fn first_non_empty<'a, I>(pairs: I, key: &str) -> Option<String>
where
    I: IntoIterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
{
    pairs
        .into_iter()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}

/// Path parameter `key` of the matched route.
pub fn path_param<'r>(req: &'r Request, key: &str) -> Option<&'r str> {
    req.extensions()
        .get::<PathParams>()
        .and_then(|params| params.get(key))
        .filter(|v| !v.is_empty())
}

/// First non-empty query parameter `key`.
pub fn query_param(req: &Request, key: &str) -> Option<String> {
    let query = req.uri().query()?;
    first_non_empty(url::form_urlencoded::parse(query.as_bytes()), key)
}

fn has_form_body(req: &Request) -> bool {
    let is_form = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);
    is_form && matches!(*req.method(), Method::POST | Method::PUT | Method::PATCH)
}

async fn form_fields(req: &mut Request) -> Option<&FormFields> {
    if req.extensions().get::<FormFields>().is_none() {
        if !has_form_body(req) {
            return None;
        }
        let body = std::mem::take(req.body_mut());
        let bytes = match to_bytes(body, FORM_LIMIT).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read form body");
                req.extensions_mut().insert(FormFields::default());
                return req.extensions().get::<FormFields>();
            }
        };
        let fields = url::form_urlencoded::parse(&bytes)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        *req.body_mut() = Body::from(bytes);
        req.extensions_mut().insert(FormFields(fields));
    }
    req.extensions().get::<FormFields>()
}

/// Looks up `key` in the path parameters, then the query string, then the
/// urlencoded form body of a `POST`, `PUT` or `PATCH` request.
pub async fn param(req: &mut Request, key: &str) -> Option<String> {
    if let Some(value) = path_param(req, key) {
        return Some(value.to_string());
    }
    if let Some(value) = query_param(req, key) {
        return Some(value);
    }
    let fields = form_fields(req).await?;
    fields
        .0
        .iter()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.clone())
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Access to the request ID set by `Middleware::request_id`.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl<B> RequestIdExt for axum::http::Request<B> {
    fn request_id(&self) -> Option<&str> {
        self.headers()
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }
}
