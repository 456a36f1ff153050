//! # homeref-domain
//!
//! Pure domain model for the homeref entity resolver.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Entities** (state holders with identity: lights, sensors, fans, …)
//! - Define **Devices** (physical things that host one or more entities)
//! - Define **Areas** (rooms and zones, with aliases and an optional floor)
//! - Build the **name index** that maps normalized names to entity ids
//! - Score entities against noisy queries with the **fuzzy matcher**
//! - Assemble immutable **registry snapshots** and run **resolution** on them
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod area;
pub mod device;
pub mod entity;
pub mod fuzzy;
pub mod name;
pub mod name_index;
pub mod query;
pub mod resolve;
pub mod snapshot;

#[cfg(test)]
mod fixtures;
