//! # homeref-adapter-storage-json
//!
//! Durable cache tier backed by plain JSON files.
//!
//! ## Responsibilities
//! - Implement the `CacheStore` port defined in `homeref-app::ports`
//! - Keep one `<dir>/<sanitized key>.json` file per key holding
//!   `{data, timestamp, ttl}`
//! - Treat unreadable or malformed files as cache misses
//!
//! ## Dependency rule
//! Depends on `homeref-app` (for port traits) and `homeref-domain` (for the
//! error type). The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod store;

pub use store::JsonFileStore;
