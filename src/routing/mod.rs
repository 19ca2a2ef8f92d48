//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at bootstrap):
//!     MethodSet (named members, declaration order)
//!     → compiler.rs (name → verb + pattern, or mount prefix)
//!        → segment.rs (camel case → lowercase segments)
//!     → table.rs (order, conflict check, register on axum Router)
//!
//! Incoming Request:
//!     axum Router (matchit tree) → DispatchAdapter → context member
//! ```
//!
//! # Design Decisions
//! - Routes compiled at bootstrap, immutable at runtime
//! - Name compilation is a pure function of the name
//! - Deterministic: shorter names register first, ties by name
//! - Path matching is left to axum; this module only decides what to register

pub mod compiler;
pub mod segment;
pub mod table;

pub use compiler::{parse_handler, parse_mount, PathPattern, Segment, Verb};
pub use table::{CompiledRoute, MethodDescriptor, RouteTable};
