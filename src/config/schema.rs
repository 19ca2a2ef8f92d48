//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::middleware::Middleware;

/// Root configuration for a host serving a bootstrapped context.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    pub listener: ListenerConfig,
    pub site: SiteConfig,
    pub timeouts: TimeoutConfig,
    pub middleware: MiddlewareConfig,
    pub observability: ObservabilityConfig,
}

impl HostConfig {
    /// Middleware in wrapping order, outermost first.
    pub fn middleware(&self) -> Vec<Middleware> {
        let m = &self.middleware;
        let mut chain = Vec::new();
        if m.request_id {
            chain.push(Middleware::request_id());
        }
        if m.log {
            chain.push(Middleware::log());
        }
        if m.recover {
            chain.push(Middleware::recover());
        }
        if self.timeouts.request_secs > 0 {
            chain.push(Middleware::timeout(Duration::from_secs(self.timeouts.request_secs)));
        }
        if m.compress {
            chain.push(Middleware::compress());
        }
        chain
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Settings handed to the demo context.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory served under `/web`.
    pub static_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("public"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Stock middleware switches.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MiddlewareConfig {
    pub request_id: bool,
    pub log: bool,
    pub recover: bool,
    pub compress: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            request_id: true,
            log: true,
            recover: true,
            compress: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub metrics_enabled: bool,
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "wish=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
