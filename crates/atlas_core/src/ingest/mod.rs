//! Ingestion pipeline: fetch, resolve and profile every repository of an owner.
//!
//! # Responsibility
//! - Drive a `ContentSource` across repositories in parallel.
//! - Hand fetched text to the ownership engine and collect profiles.
//!
//! # Invariants
//! - Output order follows the source's repository listing.
//! - Not-found optional files never fail a repository; any other fetch
//!   failure fails the run with the repository identity attached.
//! - Log events carry names, statuses and counts only.

pub mod local;
pub mod profile;
pub mod source;

use crate::config::AtlasConfig;
use crate::logging::{sanitize_message, MAX_LOG_VALUE_CHARS};
use crate::model::ownership::OwnershipParseResult;
use crate::model::profile::RepoProfile;
use log::{error, info};
use profile::build_repo_profile;
use rayon::prelude::*;
use source::{fetch_language_names, fetch_repo_text_files, ContentSource, FetchError, RepoRef};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Debug)]
pub enum IngestError {
    /// Listing the owner's repositories failed.
    List { org: String, error: FetchError },
    /// Fetching one repository's files failed.
    Fetch { repo: RepoRef, error: FetchError },
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List { org, error } => write!(f, "failed to list repositories of `{org}`: {error}"),
            Self::Fetch { repo, error } => write!(f, "failed to ingest `{repo}`: {error}"),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::List { error, .. } | Self::Fetch { error, .. } => Some(error),
        }
    }
}

/// One ingested repository: its profile plus the full explained decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedRepo {
    pub profile: RepoProfile,
    pub ownership: OwnershipParseResult,
}

/// Fetches and resolves a single repository.
pub fn ingest_repo<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoRef,
    config: &AtlasConfig,
) -> IngestResult<IngestedRepo> {
    let wrap = |error: FetchError| IngestError::Fetch {
        repo: repo.clone(),
        error,
    };
    let files = fetch_repo_text_files(source, repo, &config.codeowners_paths).map_err(wrap)?;
    let languages = fetch_language_names(source, repo).map_err(wrap)?;
    let (profile, ownership) =
        build_repo_profile(&repo.owner, &repo.repo, &files, languages, &config.readme_path);
    Ok(IngestedRepo { profile, ownership })
}

/// Ingests every repository of `org`, capped by `config.max_repos`.
///
/// # Errors
/// - [`IngestError::List`] when the listing fails.
/// - [`IngestError::Fetch`] for the first failing repository in listing order.
pub fn ingest_org<S: ContentSource + ?Sized>(
    source: &S,
    org: &str,
    config: &AtlasConfig,
) -> IngestResult<Vec<IngestedRepo>> {
    let started_at = Instant::now();
    let mut repos = source.list_repos(org).map_err(|error| {
        error!(
            "event=ingest_list module=ingest status=error org={} code={} error={}",
            org,
            error.status,
            sanitize_message(&error.message, MAX_LOG_VALUE_CHARS)
        );
        IngestError::List {
            org: org.to_string(),
            error,
        }
    })?;
    if let Some(max) = config.max_repos {
        repos.truncate(max);
    }
    info!(
        "event=ingest_start module=ingest status=start org={} repos={}",
        org,
        repos.len()
    );

    let results: Vec<IngestResult<IngestedRepo>> = repos
        .par_iter()
        .map(|repo| {
            let result = ingest_repo(source, repo, config);
            log_repo_result(repo, &result);
            result
        })
        .collect();

    let ingested = results.into_iter().collect::<IngestResult<Vec<_>>>()?;
    info!(
        "event=ingest_done module=ingest status=ok org={} repos={} duration_ms={}",
        org,
        ingested.len(),
        started_at.elapsed().as_millis()
    );
    Ok(ingested)
}

fn log_repo_result(repo: &RepoRef, result: &IngestResult<IngestedRepo>) {
    match result {
        Ok(ingested) => info!(
            "event=repo_ingested module=ingest status={} repo={} has_readme={} has_codeowners={}",
            ingested.ownership.resolved.status,
            repo,
            ingested.profile.has_readme,
            ingested.profile.has_codeowners
        ),
        Err(IngestError::Fetch { error, .. }) => error!(
            "event=repo_ingested module=ingest status=error repo={} code={} error={}",
            repo,
            error.status,
            sanitize_message(&error.message, MAX_LOG_VALUE_CHARS)
        ),
        Err(other) => error!(
            "event=repo_ingested module=ingest status=error repo={} error={}",
            repo,
            sanitize_message(&other.to_string(), MAX_LOG_VALUE_CHARS)
        ),
    }
}
