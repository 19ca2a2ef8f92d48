//! Middleware composition.
//!
//! # Responsibilities
//! - Wrap any tower layer accepted by `axum::Router::layer`
//! - Provide the stock layers: logging, panic recovery, compression,
//!   timeouts and request IDs
//!
//! # Design Decisions
//! - The middleware list is an explicit, ordered argument of bootstrap;
//!   there is no global registry
//! - The first middleware in the list is the outermost one
//! - Layers wrap the whole router, fallbacks and mounts included

use std::convert::Infallible;
use std::fmt;
use std::time::Duration;

use axum::extract::Request;
use axum::response::IntoResponse;
use axum::routing::Route;
use axum::Router;
use tower::{Layer, Service};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::request::{UuidRequestId, X_REQUEST_ID};

/// A transformation wrapping the router in one or more layers.
pub struct Middleware {
    name: &'static str,
    apply: Box<dyn FnOnce(Router) -> Router + Send>,
}

impl Middleware {
    /// Wraps an arbitrary tower layer.
    pub fn layer<L>(layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self::named("layer", layer)
    }

    fn named<L>(name: &'static str, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self {
            name,
            apply: Box::new(move |router: Router| router.layer(layer)),
        }
    }

    /// Request/response spans via `tracing`.
    pub fn log() -> Self {
        Self::named("log", TraceLayer::new_for_http())
    }

    /// Converts handler panics into `500 Internal Server Error`.
    pub fn recover() -> Self {
        Self::named("recover", CatchPanicLayer::new())
    }

    /// Compresses response bodies when the client accepts it.
    pub fn compress() -> Self {
        Self::named("compress", CompressionLayer::new())
    }

    /// Fails requests that take longer than `limit`.
    #[allow(deprecated)]
    pub fn timeout(limit: Duration) -> Self {
        Self::named("timeout", TimeoutLayer::new(limit))
    }

    /// Sets a UUID `x-request-id` on requests lacking one and echoes it on
    /// the response.
    pub fn request_id() -> Self {
        Self {
            name: "request_id",
            apply: Box::new(|router: Router| {
                router
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), UuidRequestId))
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn apply(self, router: Router) -> Router {
        (self.apply)(router)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").field("name", &self.name).finish()
    }
}

/// Wraps `router` so that `middleware[0]` sees requests first.
pub fn compose(router: Router, middleware: Vec<Middleware>) -> Router {
    middleware
        .into_iter()
        .rev()
        .fold(router, |router, m| m.apply(router))
}
