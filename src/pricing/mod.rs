//! Pricing configuration editing core.
//!
//! # Data Flow
//! ```text
//! FlowTree (vehicle-select-flow)
//!     → cascade.rs (service → category → sub-service, normalized Selector)
//!     → session.rs (generation-guarded fetch of one ConfigTree subtree)
//!     → draft.rs   (sparse edits keyed by dotted path, see path.rs)
//!     → adapter.rs (per-service request body shape)
//!     → PricingApi::update_all
//! ```
//!
//! # Design Decisions
//! - The configuration is an untyped JSON tree; field lists live in `editors`
//! - Edits never touch the baseline until a save round-trips through the server
//! - Display labels become backend keys only through `normalize`

pub mod adapter;
pub mod cascade;
pub mod draft;
pub mod flow;
pub mod normalize;
pub mod notify;
pub mod path;
pub mod session;

/// A configuration subtree as returned by the backend.
pub type ConfigTree = serde_json::Value;

pub use adapter::{AdapterRegistry, IdentityAdapter, ShapeAdapter, ShapeError, VehicleTypeAdapter};
pub use cascade::{SelectionInvalid, SelectionState, Selector, SelectorCascade};
pub use draft::{DraftStore, RawValue, TypeHint};
pub use flow::{FlowTree, SelectOption};
pub use normalize::normalize;
pub use notify::{Level, Notification, NotificationLog, Notifier, TracingNotifier};
pub use path::FieldPath;
pub use session::{ConfigSession, FetchOutcome, FetchResponse, FetchTicket, SaveReport, SessionError};
