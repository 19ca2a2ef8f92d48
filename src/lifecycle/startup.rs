//! Bootstrap: turning a provider into a server.
//!
//! # Responsibilities
//! - Obtain one context from the provider and read its member table
//! - Compile, order and conflict-check the routes
//! - Register routes and mounts, then wrap the router in middleware
//!
//! # Design Decisions
//! - Fail fast: provider errors, absent contexts, malformed member tables
//!   and route conflicts all abort bootstrap
//! - Mount members run here, once, on the bootstrap context

use std::sync::Arc;

use crate::context::{Context, Provider};
use crate::error::BootstrapError;
use crate::http::middleware::{compose, Middleware};
use crate::http::server::Server;
use crate::observability::metrics;
use crate::routing::table::RouteTable;

/// Builds a server from the members of the contexts produced by `provider`.
///
/// `middleware` wraps the whole router; its first element is outermost.
pub fn bootstrap<C: Context>(
    provider: Provider<C>,
    middleware: Vec<Middleware>,
) -> Result<Server, BootstrapError> {
    let instance = provider
        .provide()
        .map_err(BootstrapError::Provider)?
        .ok_or(BootstrapError::NilContext)?;

    let methods = instance.methods();
    methods
        .check_names()
        .map_err(|reason| BootstrapError::InvalidShape {
            shape: std::any::type_name::<C>(),
            reason,
        })?;

    let table = RouteTable::compile(&methods);
    table.check_conflicts()?;

    let methods = Arc::new(methods);
    let router = table.register(&instance, Arc::clone(&methods), &provider);
    let layers: Vec<&'static str> = middleware.iter().map(Middleware::name).collect();
    let router = compose(router, middleware);

    let routes = table.patterns();
    tracing::info!(
        context = std::any::type_name::<C>(),
        members = methods.len(),
        handlers = table.handlers().len(),
        mounts = table.mounts().len(),
        routes = ?routes,
        middleware = ?layers,
        "Bootstrap complete"
    );
    metrics::record_routes(routes.len());

    let descriptors = table
        .handlers()
        .iter()
        .chain(table.mounts())
        .cloned()
        .collect();

    Ok(Server::new(router, routes, descriptors))
}
