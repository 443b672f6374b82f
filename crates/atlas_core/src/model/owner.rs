//! Owner candidate model.
//!
//! # Responsibility
//! - Define provenance (`SourceRef`) and the closed `OwnerRef` sum type.
//! - Keep handle classification consistent with the owner kind.
//!
//! # Invariants
//! - A `Team` owner only carries team handles (`@org/team`).
//! - A `Person` owner only carries person handles (`@name`).
//! - The `Unknown` sentinel never carries handles and is always `low`.

use crate::extract::handles::{is_person_handle, is_team_handle};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Display text reported by the unknown sentinel.
pub const UNKNOWN_DISPLAY: &str = "unknown";

/// Which input file a fact was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Readme,
    Codeowners,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Readme => "readme",
            Self::Codeowners => "codeowners",
        }
    }
}

/// Provenance of one extracted fact, kept for display and audit only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Serialized as `type` to match the snapshot schema.
    #[serde(rename = "type")]
    pub kind: SourceType,
    /// Human-readable pointer, e.g. `README.md#Ownership` or
    /// `.github/CODEOWNERS:line 3`.
    pub location: String,
    /// Verbatim text the fact came from.
    pub extracted: String,
}

impl SourceRef {
    pub fn new(
        kind: SourceType,
        location: impl Into<String>,
        extracted: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            location: location.into(),
            extracted: extracted.into(),
        }
    }
}

/// Confidence attached to an owner candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Discriminant of [`OwnerRef`], used for keys and exhaustive matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Team,
    Person,
    Unknown,
}

impl OwnerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Person => "person",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for OwnerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload shared by team and person candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerDetails {
    /// Free text (`Team Platform Core`) or the leading handle.
    pub display: String,
    /// Handles in the order they were found.
    pub handles: Vec<String>,
    pub confidence: Confidence,
    pub sources: Vec<SourceRef>,
}

/// Payload of the unknown sentinel: only the sources that were inspected.
///
/// On the wire it still carries `display`, `handles` and `confidence` with
/// their fixed values, so every owner object has the same fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "UnknownOwnerWire")]
pub struct UnknownOwner {
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

#[derive(Serialize)]
struct UnknownOwnerWire {
    display: &'static str,
    handles: [String; 0],
    confidence: Confidence,
    sources: Vec<SourceRef>,
}

impl From<UnknownOwner> for UnknownOwnerWire {
    fn from(owner: UnknownOwner) -> Self {
        Self {
            display: UNKNOWN_DISPLAY,
            handles: [],
            confidence: Confidence::Low,
            sources: owner.sources,
        }
    }
}

/// A candidate or resolved repository owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OwnerRef {
    Team(OwnerDetails),
    Person(OwnerDetails),
    Unknown(UnknownOwner),
}

impl OwnerRef {
    /// Builds a team owner. Handles that are not team handles are dropped.
    pub fn team(
        display: impl Into<String>,
        handles: Vec<String>,
        confidence: Confidence,
        sources: Vec<SourceRef>,
    ) -> Self {
        Self::Team(OwnerDetails {
            display: display.into(),
            handles: handles.into_iter().filter(|h| is_team_handle(h)).collect(),
            confidence,
            sources,
        })
    }

    /// Builds a person owner. Handles that are not person handles are dropped.
    pub fn person(
        display: impl Into<String>,
        handles: Vec<String>,
        confidence: Confidence,
        sources: Vec<SourceRef>,
    ) -> Self {
        Self::Person(OwnerDetails {
            display: display.into(),
            handles: handles
                .into_iter()
                .filter(|h| is_person_handle(h))
                .collect(),
            confidence,
            sources,
        })
    }

    /// Builds the unknown sentinel carrying whatever sources were inspected.
    pub fn unknown(sources: Vec<SourceRef>) -> Self {
        Self::Unknown(UnknownOwner { sources })
    }

    pub fn kind(&self) -> OwnerKind {
        match self {
            Self::Team(_) => OwnerKind::Team,
            Self::Person(_) => OwnerKind::Person,
            Self::Unknown(_) => OwnerKind::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    pub fn display(&self) -> &str {
        match self {
            Self::Team(details) | Self::Person(details) => details.display.as_str(),
            Self::Unknown(_) => UNKNOWN_DISPLAY,
        }
    }

    pub fn handles(&self) -> &[String] {
        match self {
            Self::Team(details) | Self::Person(details) => details.handles.as_slice(),
            Self::Unknown(_) => &[],
        }
    }

    pub fn confidence(&self) -> Confidence {
        match self {
            Self::Team(details) | Self::Person(details) => details.confidence,
            Self::Unknown(_) => Confidence::Low,
        }
    }

    pub fn sources(&self) -> &[SourceRef] {
        match self {
            Self::Team(details) | Self::Person(details) => details.sources.as_slice(),
            Self::Unknown(owner) => owner.sources.as_slice(),
        }
    }

    /// Stable name used by profiles and graph ids: first handle, else display.
    ///
    /// Returns `None` for the unknown sentinel.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::Unknown(_) => None,
            _ => Some(
                self.handles()
                    .first()
                    .map(String::as_str)
                    .unwrap_or_else(|| self.display()),
            ),
        }
    }
}
