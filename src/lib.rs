//! Convention-based HTTP routing.
//!
//! A [`Context`] lists its members by name; [`bootstrap`] compiles each
//! name into a route (`GetUserByID` → `GET /user/{id}`, `MountWeb` → a
//! sub-service under `/web`) and assembles an axum router. Every request
//! gets a fresh context from the [`Provider`].

pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use context::{BoxError, Context, MethodSet, Provider, SubHandler};
pub use error::BootstrapError;
pub use http::{Middleware, Server};
pub use lifecycle::{bootstrap, Shutdown};
