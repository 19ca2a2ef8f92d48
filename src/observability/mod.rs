//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap and dispatch produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms, gauges)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber or exporter
//!   is the host's call
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
