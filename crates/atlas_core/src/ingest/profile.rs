//! Repository profile assembly.
//!
//! # Responsibility
//! - Run the ownership engine over fetched text and flatten the decision into
//!   the `RepoProfile` shape written to snapshots.
//!
//! # Invariants
//! - `ok` / `multi_owner` expose every deduplicated candidate.
//! - `conflict` exposes only the winning owner.
//! - `unknown` / `placeholder` expose no teams or users.

use crate::ingest::source::RepoTextFiles;
use crate::model::owner::{OwnerRef, SourceType};
use crate::model::ownership::{OwnershipParseResult, OwnershipStatus, ResolvedOwnership};
use crate::model::profile::{OwnershipSource, ProfileOwnership, RepoProfile};
use crate::ownership::{parse_ownership, OwnershipInput};

/// Builds the profile and full ownership decision for one repository.
pub fn build_repo_profile(
    owner: &str,
    name: &str,
    files: &RepoTextFiles,
    languages: Vec<String>,
    readme_path: &str,
) -> (RepoProfile, OwnershipParseResult) {
    let readme_text = non_empty(files.readme.as_deref());
    let codeowners_text = non_empty(files.codeowners.text.as_deref());

    let parsed = parse_ownership(&OwnershipInput {
        readme_text,
        readme_path: Some(readme_path),
        codeowners_text,
        codeowners_path: files.codeowners.path.as_deref(),
    });

    let profile = RepoProfile {
        owner: owner.to_string(),
        name: name.to_string(),
        has_readme: readme_text.is_some(),
        has_codeowners: codeowners_text.is_some(),
        ownership: profile_ownership(&parsed.resolved),
        languages,
    };
    (profile, parsed)
}

/// Flattens a resolver decision into teams, users and a source tag.
pub fn profile_ownership(resolved: &ResolvedOwnership) -> ProfileOwnership {
    let exposed: &[OwnerRef] = match resolved.status {
        OwnershipStatus::Ok | OwnershipStatus::MultiOwner => &resolved.candidates,
        OwnershipStatus::Conflict => std::slice::from_ref(&resolved.resolved_owner),
        OwnershipStatus::Unknown | OwnershipStatus::Placeholder => &[],
    };

    let mut teams = Vec::new();
    let mut users = Vec::new();
    for owner in exposed {
        let Some(identity) = owner.identity() else {
            continue;
        };
        let bucket = match owner {
            OwnerRef::Team(_) => &mut teams,
            OwnerRef::Person(_) => &mut users,
            OwnerRef::Unknown(_) => continue,
        };
        if !bucket.iter().any(|existing: &String| existing == identity) {
            bucket.push(identity.to_string());
        }
    }

    let source = match resolved.resolved_owner.sources().first() {
        _ if resolved.resolved_owner.is_unknown() => OwnershipSource::Unknown,
        Some(source) => match source.kind {
            SourceType::Readme => OwnershipSource::Readme,
            SourceType::Codeowners => OwnershipSource::Codeowners,
        },
        None => OwnershipSource::Unknown,
    };

    ProfileOwnership {
        teams,
        users,
        source,
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|text| !text.trim().is_empty())
}
