//! # homeref-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RegistrySource`: fetch entities, devices and areas from the remote registry
//!   - `CacheStore`: durable tier of the cache
//!   - `Clock`: wall-clock time used for cache freshness
//! - Provide the two-tier **cache layer** with per-key auto-refresh
//! - Define **driving/inbound** use-case services:
//!   - `RegistryService`: load, refresh and publish registry snapshots
//!   - `ResolverService`: turn a reference into exactly one entity id
//!   - `SearchService`: ranked fuzzy search with suggestions
//!
//! ## Dependency rule
//! Depends on `homeref-domain` only (plus tokio and friends for scheduling).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod cache;
pub mod ports;
pub mod services;
pub mod snapshot_cell;

#[cfg(test)]
mod testing;
