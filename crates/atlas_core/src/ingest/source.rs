//! Content-source boundary and optional-file translation.
//!
//! # Responsibility
//! - Define the `ContentSource` seam implemented by hosting-API clients and
//!   local checkouts.
//! - Translate "not found" for optional files into absent content before the
//!   resolution core sees it.
//!
//! # Invariants
//! - Only `404` is treated as absence; every other failure propagates.
//! - CODEOWNERS paths are tried in configured order; the first non-empty
//!   body wins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// HTTP-like status used for "not found".
pub const STATUS_NOT_FOUND: u16 = 404;

/// One repository on the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Transport-level failure carrying an HTTP-like status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub status: u16,
    pub message: String,
}

impl FetchError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(STATUS_NOT_FOUND, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == STATUS_NOT_FOUND
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "fetch failed with status {}: {}", self.status, self.message)
    }
}

impl Error for FetchError {}

pub type FetchResult<T> = Result<T, FetchError>;

/// Read-only access to repository listings and file contents.
///
/// Implementations must be shareable across ingestion worker threads.
pub trait ContentSource: Send + Sync {
    /// Lists repositories owned by `org`.
    fn list_repos(&self, org: &str) -> FetchResult<Vec<RepoRef>>;
    /// Returns the repository README body.
    fn fetch_readme(&self, repo: &RepoRef) -> FetchResult<String>;
    /// Returns the body of the file at `path`.
    fn fetch_file(&self, repo: &RepoRef, path: &str) -> FetchResult<String>;
    /// Returns language byte counts.
    fn fetch_languages(&self, repo: &RepoRef) -> FetchResult<BTreeMap<String, u64>>;
}

/// CODEOWNERS lookup outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeownersFile {
    /// Path the file was found at.
    pub path: Option<String>,
    pub text: Option<String>,
}

/// README and CODEOWNERS text for one repository, absent files as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoTextFiles {
    pub readme: Option<String>,
    pub codeowners: CodeownersFile,
}

/// Fetches README and CODEOWNERS for `repo`.
pub fn fetch_repo_text_files<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoRef,
    codeowners_paths: &[String],
) -> FetchResult<RepoTextFiles> {
    let readme = optional_text(source.fetch_readme(repo))?;
    let codeowners = fetch_codeowners(source, repo, codeowners_paths)?;
    Ok(RepoTextFiles { readme, codeowners })
}

/// Tries `codeowners_paths` in order and returns the first non-empty file.
pub fn fetch_codeowners<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoRef,
    codeowners_paths: &[String],
) -> FetchResult<CodeownersFile> {
    for path in codeowners_paths {
        if let Some(text) = optional_text(source.fetch_file(repo, path))? {
            return Ok(CodeownersFile {
                path: Some(path.clone()),
                text: Some(text),
            });
        }
    }
    Ok(CodeownersFile::default())
}

/// Returns language names, most bytes first, ties by name.
pub fn fetch_language_names<S: ContentSource + ?Sized>(
    source: &S,
    repo: &RepoRef,
) -> FetchResult<Vec<String>> {
    let mut languages: Vec<(String, u64)> = match source.fetch_languages(repo) {
        Ok(languages) => languages.into_iter().collect(),
        Err(err) if err.is_not_found() => Vec::new(),
        Err(err) => return Err(err),
    };
    languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(languages.into_iter().map(|(name, _)| name).collect())
}

/// Maps not-found and empty bodies to `None`.
fn optional_text(result: FetchResult<String>) -> FetchResult<Option<String>> {
    match result {
        Ok(text) if text.is_empty() => Ok(None),
        Ok(text) => Ok(Some(text)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
