//! Per-route dispatch.
//!
//! # Responsibilities
//! - Obtain a fresh context from the provider for every request
//! - Invoke the member registered for the route by its index
//! - Expose matched path parameters to the member
//! - Turn provider failures into `500 Internal Server Error`
//!
//! # Design Decisions
//! - The adapter holds the provider and the shared member table, never a
//!   context instance, so no state is shared between requests
//! - The member index is resolved once at bootstrap; no name lookup here

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};
use std::time::Instant;

use axum::extract::{FromRequestParts, RawPathParams, Request};
use axum::http::StatusCode;
use axum::response::Response;
use futures_util::future::BoxFuture;
use tower::Service;

use crate::context::{Context, MethodSet, Provider};
use crate::http::request::PathParams;
use crate::http::response::error;
use crate::observability::metrics;

/// Invokes one member of a freshly provided context.
pub struct DispatchAdapter<C> {
    provider: Provider<C>,
    methods: Arc<MethodSet<C>>,
    index: usize,
    name: Arc<str>,
}

impl<C: Context> DispatchAdapter<C> {
    pub(crate) fn new(provider: Provider<C>, methods: Arc<MethodSet<C>>, index: usize) -> Self {
        let name: Arc<str> = methods
            .members()
            .get(index)
            .map(|m| Arc::from(m.name.as_str()))
            .unwrap_or_else(|| Arc::from("<unknown>"));
        Self {
            provider,
            methods,
            index,
            name,
        }
    }

    async fn dispatch(self, req: Request) -> Response {
        let start = Instant::now();

        let ctx = match self.provider.provide() {
            Ok(Some(ctx)) => ctx,
            Ok(None) => {
                tracing::error!(member = %self.name, "Provider returned no context");
                metrics::record_provider_failure(&self.name);
                return self.fail(start);
            }
            Err(e) => {
                tracing::error!(member = %self.name, error = %e, "Provider failed");
                metrics::record_provider_failure(&self.name);
                return self.fail(start);
            }
        };

        let Some(call) = self.methods.handler_at(self.index) else {
            tracing::error!(member = %self.name, index = self.index, "Member is not a handler");
            return self.fail(start);
        };

        let req = with_path_params(req).await;
        tracing::debug!(
            member = %self.name,
            method = %req.method(),
            path = %req.uri().path(),
            "Dispatching request"
        );

        let response = call(ctx, req).await;
        metrics::record_request(&self.name, response.status().as_u16(), start);
        response
    }

    fn fail(&self, start: Instant) -> Response {
        metrics::record_request(&self.name, 500, start);
        error(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Copies the matched path parameters into a `PathParams` extension.
async fn with_path_params(req: Request) -> Request {
    let (mut parts, body) = req.into_parts();
    match RawPathParams::from_request_parts(&mut parts, &()).await {
        Ok(raw) => {
            parts.extensions.insert(PathParams::from_raw(&raw));
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "No usable path parameters");
            parts.extensions.insert(PathParams::default());
        }
    }
    Request::from_parts(parts, body)
}

impl<C> Clone for DispatchAdapter<C> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            methods: Arc::clone(&self.methods),
            index: self.index,
            name: Arc::clone(&self.name),
        }
    }
}

impl<C: Context> Service<Request> for DispatchAdapter<C> {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let adapter = self.clone();
        Box::pin(async move { Ok(adapter.dispatch(req).await) })
    }
}
