//! # Lockbox
//!
//! Lockbox is a multi-tenant secret store: clients write opaque JSON
//! payloads under hierarchical names, read them back while they are live,
//! and have them become inaccessible and eventually purged once their
//! expiration passes. Access is gated by a capability-scope model rather
//! than ownership: any caller holding a scope string that authorizes a
//! name may operate on it.
//!
//! ## Architecture
//!
//! ```text
//! REST API Layer → Authorization Gate → Secret Store → SQLite
//!      ↓                  ↓                  ↓
//! Authentication     Scope Matcher     Envelope Codec
//! ```
//!
//! The expiry sweeper runs beside the API as an independent periodic task,
//! purging rows past their expiration with the store's low-level
//! enumeration and delete capability.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod observability;
pub mod secrets;
pub mod startup;
pub mod storage;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{Error, Result};
pub use observability::init_tracing;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
