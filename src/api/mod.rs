//! Pricing backend API subsystem.
//!
//! # Data Flow
//! ```text
//! CredentialProvider (bearer token)
//!     → client.rs (URL building, headers, retries for reads)
//!     → GET  /vehicle-select-flow
//!     → GET  /comprehensive-pricing/{category}/{service}/{subService}
//!     → PUT  /comprehensive-pricing/update-all
//! ```
//!
//! # Design Decisions
//! - `PricingApi` is a trait so the session can run against any backend
//! - 401s go back to the credential provider; the session only sees an error
//! - Writes are sent exactly once

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{credentials_for, Anonymous, CredentialProvider, EnvToken, StaticToken};
pub use client::{HttpPricingApi, PricingApi};
pub use types::{ApiError, ApiResult};
