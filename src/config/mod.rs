//! Host configuration.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HostConfig (validated, immutable)
//!     → middleware list + listener settings for the host binary
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks
//! - The library core never reads config; only hosts do

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    HostConfig, ListenerConfig, MiddlewareConfig, ObservabilityConfig, SiteConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
