//! HTTP handling subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → middleware.rs (caller-supplied layers, outermost first)
//!     → server.rs (Server facade → axum Router)
//!     → dispatch.rs (fresh context, member by index)
//!     → request.rs / response.rs (helpers used inside members)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::Middleware;
pub use request::{param, path_param, query_param, PathParams, RequestIdExt, X_REQUEST_ID};
pub use response::{error, json, respond, serve_file};
pub use server::Server;
