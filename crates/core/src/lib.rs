//! Core business logic for the SWIFT code registry.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through the [`registry::RegistryStore`] trait, which the
//! db crate implements.
//!
//! # Modules
//!
//! - `validation` - Format predicates for codes, names and addresses
//! - `rate_limit` - Per-client token buckets with idle eviction
//! - `registry` - Domain types, store seam and the registry facade

pub mod rate_limit;
pub mod registry;
pub mod validation;

#[cfg(test)]
mod validation_props;
