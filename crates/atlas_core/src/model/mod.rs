//! Domain model for ownership resolution and atlas projection.
//!
//! # Responsibility
//! - Define the owner candidate shapes shared by extractors and the resolver.
//! - Define the per-repository profile and the derived graph shapes.
//!
//! # Invariants
//! - Every model type is immutable once built by its producing stage.
//! - Wire field names follow the snapshot/JSON contract (camelCase).

pub mod graph;
pub mod owner;
pub mod ownership;
pub mod profile;
