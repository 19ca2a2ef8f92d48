//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Provider → context → member table → route table → router
//!     → middleware → Server
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Signal received → Shutdown::trigger → Server::run drains and exits
//! ```
//!
//! # Design Decisions
//! - Fail fast: any bootstrap error is fatal and yields no server
//! - Bootstrap is synchronous and runs once, before serving starts

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::bootstrap;
