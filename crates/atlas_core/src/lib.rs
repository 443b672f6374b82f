//! Core logic for the repository ownership atlas.
//! Extraction, resolution, ingestion, persistence and graph projection live
//! here; the CLI only wires flags to these APIs.

pub mod config;
pub mod db;
pub mod extract;
pub mod graph;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod ownership;
pub mod repo;
pub mod snapshot;

pub use config::{AtlasConfig, ConfigError, ConfigResult};
pub use graph::{build_atlas_graph, owner_map};
pub use ingest::local::DirectoryContentSource;
pub use ingest::source::{
    fetch_repo_text_files, CodeownersFile, ContentSource, FetchError, FetchResult, RepoRef,
    RepoTextFiles,
};
pub use ingest::{ingest_org, ingest_repo, IngestError, IngestResult, IngestedRepo};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::graph::{AtlasEdge, AtlasGraph, AtlasNode, EdgeKind, NodeKind};
pub use model::owner::{Confidence, OwnerKind, OwnerRef, SourceRef, SourceType};
pub use model::ownership::{
    CodeownersOwnership, OwnershipParseResult, OwnershipStatus, ReadmeOwnership,
    ResolvedOwnership,
};
pub use model::profile::{OwnershipSource, ProfileOwnership, RepoProfile};
pub use ownership::{parse_ownership, OwnershipInput};
pub use repo::{
    CatalogError, CatalogResult, OwnershipCatalog, ResolutionRecord, RunId, RunSummary,
    SqliteOwnershipCatalog,
};
pub use snapshot::{load_snapshot, write_snapshot, SnapshotError, SnapshotResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
