//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Read request to backend:
//!     → reqwest client timeouts (connect/request, from config)
//!     → On failure: retries.rs (check if retryable, retry with backoff)
//!     → backoff.rs (exponential delay + jitter)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every backend call has a deadline
//! - Retries only for reads (GET); writes fail straight to the caller
//! - Jittered backoff prevents synchronized retries

pub mod backoff;
pub mod retries;
