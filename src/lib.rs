//! Pricing configuration console library

pub mod api;
pub mod config;
pub mod editors;
pub mod observability;
pub mod pricing;
pub mod resilience;

pub use api::{HttpPricingApi, PricingApi};
pub use config::schema::ConsoleConfig;
pub use pricing::session::ConfigSession;
