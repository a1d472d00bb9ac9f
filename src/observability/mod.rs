//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (request counter and latency histogram)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - `x-request-id` is set by the server layers and appears in every trace span
//! - Metrics are cheap (atomic increments) and no-ops when no recorder is installed

pub mod logging;
pub mod metrics;
