//! Server facade.
//!
//! # Responsibilities
//! - Hold the assembled router and the list of registered patterns
//! - Act as a tower `Service` for embedding in a host
//! - Serve on a listener with graceful shutdown
//!
//! # Design Decisions
//! - The router is immutable after bootstrap; clones share nothing mutable
//! - A server without a router answers every request with 404

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;
use futures_util::future::BoxFuture;
use tokio::net::TcpListener;
use tower::Service;

use crate::http::response::error;
use crate::routing::table::MethodDescriptor;

/// HTTP server produced by `bootstrap`.
#[derive(Clone, Default)]
pub struct Server {
    router: Option<Router>,
    routes: Arc<BTreeSet<String>>,
    descriptors: Arc<[MethodDescriptor]>,
}

impl Server {
    pub(crate) fn new(
        router: Router,
        routes: BTreeSet<String>,
        descriptors: Vec<MethodDescriptor>,
    ) -> Self {
        Self {
            router: Some(router),
            routes: Arc::new(routes),
            descriptors: descriptors.into(),
        }
    }

    /// Every pattern with a registered handler for at least one method.
    ///
    /// Mounts are listed as `prefix/*`.
    pub fn routes(&self) -> Vec<String> {
        self.routes.iter().cloned().collect()
    }

    /// Compiled members, handlers first, each group in registration order.
    pub fn descriptors(&self) -> &[MethodDescriptor] {
        &self.descriptors
    }

    /// The underlying axum router.
    pub fn into_router(self) -> Router {
        self.router
            .unwrap_or_else(|| Router::new().fallback(|| async { error(StatusCode::NOT_FOUND) }))
    }

    /// Serves connections from `listener` until `signal` resolves.
    pub async fn run<F>(self, listener: TcpListener, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, routes = self.routes.len(), "HTTP server starting");

        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("routes", &self.routes)
            .field("assembled", &self.router.is_some())
            .finish()
    }
}

impl Service<Request> for Server {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        match self.router.as_mut() {
            Some(router) => Box::pin(router.call(req)),
            None => Box::pin(async { Ok(error(StatusCode::NOT_FOUND)) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unassembled_server_is_404() {
        let server = Server::default();
        assert!(server.routes().is_empty());

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = server.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
