//! Member tables.
//!
//! # Responsibilities
//! - Record the named members of a context in declaration order
//! - Classify each member by call shape: handler, mount or plain member
//! - Erase member types so the route table can hold them uniformly

use std::collections::HashSet;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures_util::future::BoxFuture;
use tower::Service;

use crate::context::Context;

pub(crate) type HandlerFn<C> = Arc<dyn Fn(C, Request) -> BoxFuture<'static, Response> + Send + Sync>;

pub(crate) type MountFn<C> = Box<dyn Fn(&C) -> SubHandler + Send + Sync>;

/// Call shape of a member.
pub(crate) enum MemberKind<C> {
    /// Takes the context and a request, produces a response.
    Handler(HandlerFn<C>),
    /// Takes the context by reference, produces a sub-service.
    Mount(MountFn<C>),
    /// Anything else; listed but never routed.
    Other,
}

pub(crate) struct Member<C> {
    pub(crate) name: String,
    pub(crate) kind: MemberKind<C>,
}

/// Ordered list of the named members of a context.
pub struct MethodSet<C> {
    members: Vec<Member<C>>,
}

impl<C: Context> MethodSet<C> {
    pub fn new() -> Self {
        Self { members: Vec::new() }
    }

    /// Adds a request handler.
    pub fn handler<F, Fut, R>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(C, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let call: HandlerFn<C> = Arc::new(move |ctx: C, req: Request| -> BoxFuture<'static, Response> {
            let fut = f(ctx, req);
            Box::pin(async move { fut.await.into_response() })
        });
        self.members.push(Member {
            name: name.into(),
            kind: MemberKind::Handler(call),
        });
        self
    }

    /// Adds a mount producing the service installed under the mount prefix.
    pub fn mount<F, T>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&C) -> T + Send + Sync + 'static,
        T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        T::Response: IntoResponse,
        T::Future: Send + 'static,
    {
        self.members.push(Member {
            name: name.into(),
            kind: MemberKind::Mount(Box::new(move |ctx: &C| SubHandler::new(f(ctx)))),
        });
        self
    }

    /// Adds a member that is neither a handler nor a mount.
    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.members.push(Member {
            name: name.into(),
            kind: MemberKind::Other,
        });
        self
    }
}

impl<C> MethodSet<C> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    pub(crate) fn members(&self) -> &[Member<C>] {
        &self.members
    }

    pub(crate) fn handler_at(&self, index: usize) -> Option<&HandlerFn<C>> {
        match self.members.get(index).map(|m| &m.kind) {
            Some(MemberKind::Handler(call)) => Some(call),
            _ => None,
        }
    }

    /// Checks that every member has a distinct, non-empty name.
    pub(crate) fn check_names(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.members.len());
        for (index, member) in self.members.iter().enumerate() {
            if member.name.is_empty() {
                return Err(format!("member {} has an empty name", index));
            }
            if !seen.insert(member.name.as_str()) {
                return Err(format!("member `{}` is declared more than once", member.name));
            }
        }
        Ok(())
    }
}

impl<C: Context> Default for MethodSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A service installed under a mount prefix.
pub struct SubHandler {
    install: Box<dyn FnOnce(Router, &str) -> Router + Send>,
}

impl SubHandler {
    pub fn new<T>(service: T) -> Self
    where
        T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        T::Response: IntoResponse,
        T::Future: Send + 'static,
    {
        Self {
            install: Box::new(move |router: Router, prefix: &str| {
                // axum refuses to nest at the root; the root mount catches
                // everything no route claims instead.
                if prefix == "/" {
                    router.fallback_service(service)
                } else {
                    router.nest_service(prefix, service)
                }
            }),
        }
    }

    /// Installs the service on `router` under `prefix`, stripping the prefix.
    pub(crate) fn install(self, router: Router, prefix: &str) -> Router {
        (self.install)(router, prefix)
    }
}
