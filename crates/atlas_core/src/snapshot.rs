//! Snapshot file I/O.
//!
//! A snapshot is the pretty-printed JSON array of `RepoProfile` values that
//! the graph projection and any downstream consumer read.

use crate::model::profile::RepoProfile;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug)]
pub enum SnapshotError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "snapshot I/O failed for `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "snapshot `{}` is not valid JSON: {source}", path.display())
            }
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Writes `profiles` to `path`, creating parent directories.
pub fn write_snapshot(path: &Path, profiles: &[RepoProfile]) -> SnapshotResult<()> {
    let io_error = |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let mut body = serde_json::to_string_pretty(profiles).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    body.push('\n');
    std::fs::write(path, body).map_err(io_error)?;

    info!(
        "event=snapshot_write module=snapshot status=ok repos={} path={}",
        profiles.len(),
        path.display()
    );
    Ok(())
}

pub fn load_snapshot(path: &Path) -> SnapshotResult<Vec<RepoProfile>> {
    let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{load_snapshot, write_snapshot, SnapshotError};
    use crate::model::profile::{OwnershipSource, ProfileOwnership, RepoProfile};

    #[test]
    fn write_creates_parent_dirs_and_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/repos.json");
        let profile = RepoProfile {
            owner: "acme".to_string(),
            name: "api".to_string(),
            has_readme: true,
            has_codeowners: false,
            ownership: ProfileOwnership {
                teams: vec!["@acme/core".to_string()],
                users: Vec::new(),
                source: OwnershipSource::Readme,
            },
            languages: vec!["Rust".to_string()],
        };

        write_snapshot(&path, &[profile.clone()]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"hasReadme\": true"));
        assert!(text.contains("\"source\": \"readme\""));
        assert_eq!(load_snapshot(&path).unwrap(), vec![profile]);
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_snapshot(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, SnapshotError::Io { .. }));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(load_snapshot(&bad).unwrap_err(), SnapshotError::Json { .. }));
    }
}
