//! Per-source and resolved ownership results.
//!
//! # Invariants
//! - `ResolvedOwnership::resolved_owner` is always present, `Unknown` included.
//! - `ResolvedOwnership::notes` is never empty once returned by the resolver.

use crate::model::owner::{OwnerRef, SourceRef};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Facts and candidates derived from the README "Ownership" section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadmeOwnership {
    /// Path label used in source locations.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owning_team_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_raw: Option<String>,
    pub owner_candidates: Vec<OwnerRef>,
    pub sources: Vec<SourceRef>,
    pub has_placeholders: bool,
}

/// One tokenized CODEOWNERS rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeownersRule {
    pub pattern: String,
    pub owners: Vec<String>,
    /// 1-indexed line number in the source file.
    pub line: usize,
    /// Untouched source line, comments included.
    pub raw: String,
}

/// The rule selected as the repository-wide default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalRule {
    pub pattern: String,
    pub owners: Vec<String>,
    pub line: usize,
}

impl From<&CodeownersRule> for GlobalRule {
    fn from(rule: &CodeownersRule) -> Self {
        Self {
            pattern: rule.pattern.clone(),
            owners: rule.owners.clone(),
            line: rule.line,
        }
    }
}

/// Facts and candidates derived from a CODEOWNERS file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeownersOwnership {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_rule: Option<GlobalRule>,
    pub owner_candidates: Vec<OwnerRef>,
    pub sources: Vec<SourceRef>,
}

/// Outcome class of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipStatus {
    Ok,
    MultiOwner,
    Conflict,
    Unknown,
    Placeholder,
}

impl OwnershipStatus {
    pub const ALL: [OwnershipStatus; 5] = [
        Self::Ok,
        Self::MultiOwner,
        Self::Conflict,
        Self::Unknown,
        Self::Placeholder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::MultiOwner => "multi_owner",
            Self::Conflict => "conflict",
            Self::Unknown => "unknown",
            Self::Placeholder => "placeholder",
        }
    }
}

impl Display for OwnershipStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OwnershipStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unsupported ownership status `{normalized}`; expected ok|multi_owner|conflict|unknown|placeholder"
                )
            })
    }
}

/// Final decision for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOwnership {
    pub status: OwnershipStatus,
    pub resolved_owner: OwnerRef,
    /// Deduplicated union of both sources' candidates.
    pub candidates: Vec<OwnerRef>,
    /// Human-readable explanation of the branch that fired.
    pub notes: Vec<String>,
}

/// Aggregate ownership result for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipParseResult {
    pub readme: ReadmeOwnership,
    pub codeowners: CodeownersOwnership,
    pub resolved: ResolvedOwnership,
}
