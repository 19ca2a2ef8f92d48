//! Request contexts.
//!
//! # Data Flow
//! ```text
//! Bootstrap:
//!     Provider → context instance
//!     → Context::methods() (named members, in declaration order)
//!     → routing::table compiles names into descriptors
//!
//! Per request:
//!     Provider → fresh context instance
//!     → member at the descriptor's index is invoked with the request
//! ```
//!
//! # Design Decisions
//! - Members are listed explicitly; a member's position is its identity
//! - Every instance produced by one provider exposes the same members in
//!   the same order, so an index resolved at bootstrap stays valid
//! - Contexts are moved into the handler call; per-request state never
//!   crosses requests unless the provider chooses to share it

pub mod methods;
pub mod provider;

pub use methods::{MethodSet, SubHandler};
pub use provider::{BoxError, Provider};

/// A type whose named members are turned into routes.
///
/// ```
/// use axum::extract::Request;
/// use axum::response::Response;
/// use wish::{Context, MethodSet};
/// use wish::http::response::respond;
/// use axum::http::StatusCode;
///
/// struct Site;
///
/// impl Site {
///     async fn get_hello(self, _req: Request) -> Response {
///         respond("text/plain", StatusCode::OK, "hello")
///     }
/// }
///
/// impl Context for Site {
///     fn methods(&self) -> MethodSet<Self> {
///         MethodSet::new().handler("GetHello", Self::get_hello)
///     }
/// }
/// ```
pub trait Context: Send + Sized + 'static {
    /// The member table of this type.
    fn methods(&self) -> MethodSet<Self>;
}
