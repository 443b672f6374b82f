//! Repository profile: the unit ingested, persisted and projected.

use serde::{Deserialize, Serialize};

/// Which source the resolved owner came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipSource {
    Readme,
    Codeowners,
    Unknown,
}

/// Resolved owners flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOwnership {
    /// Team identities (handle, or free-text name when no handle exists).
    pub teams: Vec<String>,
    /// Person handles.
    pub users: Vec<String>,
    pub source: OwnershipSource,
}

impl ProfileOwnership {
    pub fn unknown() -> Self {
        Self {
            teams: Vec::new(),
            users: Vec::new(),
            source: OwnershipSource::Unknown,
        }
    }
}

/// One repository as written to snapshot files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoProfile {
    /// Owner login (organization or user).
    pub owner: String,
    pub name: String,
    pub has_readme: bool,
    pub has_codeowners: bool,
    pub ownership: ProfileOwnership,
    /// Language names, most bytes first.
    #[serde(default)]
    pub languages: Vec<String>,
}

impl RepoProfile {
    /// Returns `<owner>/<name>`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}
