//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → CLI flags override individual fields
//!     → validation.rs (semantic checks on the merged result)
//!     → ConsoleConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError, Overrides};
pub use schema::ApiConfig;
pub use schema::ConsoleConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
pub use schema::TimeoutConfig;
