//! Persistence contracts over the catalog database.
//!
//! # Responsibility
//! - Define the catalog contract used by the CLI and reports.
//! - Keep SQL inside this layer.
//!
//! # Invariants
//! - Reads reject malformed persisted rows instead of masking them.

pub mod ownership_repo;

pub use ownership_repo::{
    CatalogError, CatalogResult, OwnershipCatalog, ResolutionRecord, RunId, RunSummary,
    SqliteOwnershipCatalog,
};
