//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Session and API client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (operator terminal)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (selector, generation, path) on every event
//! - Every outgoing request carries an `x-request-id`
//! - Metrics are cheap and no-ops when the exporter is off

pub mod logging;
pub mod metrics;
