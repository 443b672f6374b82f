//! Ownership resolver.
//!
//! # Responsibility
//! - Merge README and CODEOWNERS candidates into one explained decision.
//!
//! # Invariants
//! - Rules are evaluated in `RESOLUTION_RULES` order; the first outcome wins.
//! - README is trusted over CODEOWNERS; a disagreement is surfaced as
//!   `conflict` but the README owner is still returned.
//! - `ok` vs `multi_owner` depends only on the deduplicated candidate count.
//! - Returned `notes` are never empty.

use crate::model::owner::{OwnerKind, OwnerRef, SourceRef, SourceType};
use crate::model::ownership::{
    CodeownersOwnership, OwnershipStatus, ReadmeOwnership, ResolvedOwnership,
};
use crate::ownership::candidates::{dedupe_owners, owners_overlap};
use crate::ownership::readme::readme_section_location;
use log::debug;

/// Inputs shared by every rule.
struct ResolutionContext<'a> {
    readme: &'a ReadmeOwnership,
    codeowners: &'a CodeownersOwnership,
    /// Deduplicated README + CODEOWNERS candidates, README first.
    all_candidates: Vec<OwnerRef>,
}

impl ResolutionContext<'_> {
    fn readme_candidate(&self, kind: OwnerKind) -> Option<&OwnerRef> {
        self.readme
            .owner_candidates
            .iter()
            .find(|owner| owner.kind() == kind)
    }

    fn codeowners_candidate(&self, kind: OwnerKind) -> Option<&OwnerRef> {
        self.codeowners
            .owner_candidates
            .iter()
            .find(|owner| owner.kind() == kind)
    }

    fn count_status(&self) -> OwnershipStatus {
        if self.all_candidates.len() > 1 {
            OwnershipStatus::MultiOwner
        } else {
            OwnershipStatus::Ok
        }
    }

    fn resolved(
        &self,
        status: OwnershipStatus,
        owner: &OwnerRef,
        notes: &[&str],
    ) -> ResolvedOwnership {
        ResolvedOwnership {
            status,
            resolved_owner: owner.clone(),
            candidates: self.all_candidates.clone(),
            notes: notes.iter().map(|note| note.to_string()).collect(),
        }
    }
}

/// One named step of the precedence chain.
struct ResolutionRule {
    name: &'static str,
    apply: fn(&ResolutionContext<'_>) -> Option<ResolvedOwnership>,
}

const RESOLUTION_RULES: &[ResolutionRule] = &[
    ResolutionRule {
        name: "placeholder_only",
        apply: placeholder_only,
    },
    ResolutionRule {
        name: "readme_team",
        apply: readme_team,
    },
    ResolutionRule {
        name: "readme_person",
        apply: readme_person,
    },
    ResolutionRule {
        name: "codeowners_team",
        apply: codeowners_team,
    },
    ResolutionRule {
        name: "codeowners_person",
        apply: codeowners_person,
    },
    ResolutionRule {
        name: "readme_placeholder",
        apply: readme_placeholder,
    },
];

/// Name reported when no rule in the table fires.
pub const FALLBACK_RULE: &str = "no_metadata";

/// Names of the resolution rules in evaluation order, fallback last.
pub fn rule_names() -> Vec<&'static str> {
    RESOLUTION_RULES
        .iter()
        .map(|rule| rule.name)
        .chain(std::iter::once(FALLBACK_RULE))
        .collect()
}

/// Resolves one repository's owner from both sources.
pub fn resolve_ownership(
    readme: &ReadmeOwnership,
    codeowners: &CodeownersOwnership,
) -> ResolvedOwnership {
    resolve_ownership_traced(readme, codeowners).1
}

/// Same as [`resolve_ownership`], also returning the name of the rule that fired.
pub fn resolve_ownership_traced(
    readme: &ReadmeOwnership,
    codeowners: &CodeownersOwnership,
) -> (&'static str, ResolvedOwnership) {
    let all_candidates = dedupe_owners(
        &readme
            .owner_candidates
            .iter()
            .chain(codeowners.owner_candidates.iter())
            .cloned()
            .collect::<Vec<_>>(),
    );
    let context = ResolutionContext {
        readme,
        codeowners,
        all_candidates,
    };

    let (name, resolved) = RESOLUTION_RULES
        .iter()
        .find_map(|rule| (rule.apply)(&context).map(|resolved| (rule.name, resolved)))
        .unwrap_or_else(|| (FALLBACK_RULE, no_metadata(&context)));

    debug!(
        "event=ownership_resolved module=resolve rule={} status={} owner_kind={} candidates={}",
        name,
        resolved.status,
        resolved.resolved_owner.kind(),
        resolved.candidates.len()
    );
    (name, resolved)
}

fn placeholder_only(context: &ResolutionContext<'_>) -> Option<ResolvedOwnership> {
    if !context.readme.has_placeholders
        || !context.readme.owner_candidates.is_empty()
        || !context.codeowners.owner_candidates.is_empty()
    {
        return None;
    }

    Some(ResolvedOwnership {
        status: OwnershipStatus::Placeholder,
        resolved_owner: OwnerRef::unknown(vec![SourceRef::new(
            SourceType::Readme,
            readme_section_location(&context.readme.path),
            "placeholders",
        )]),
        candidates: Vec::new(),
        notes: vec![
            "Ownership appears to be template placeholders and no CODEOWNERS owner was found."
                .to_string(),
        ],
    })
}

fn readme_team(context: &ResolutionContext<'_>) -> Option<ResolvedOwnership> {
    let owner = context.readme_candidate(OwnerKind::Team)?;
    Some(readme_outcome(
        context,
        owner,
        &[
            "README declares a team owner, but the CODEOWNERS global rule points to a different owner.",
            "README is preferred for who to talk to; ownership should be clarified.",
        ],
        "Resolved owner from README owning team.",
    ))
}

fn readme_person(context: &ResolutionContext<'_>) -> Option<ResolvedOwnership> {
    let owner = context.readme_candidate(OwnerKind::Person)?;
    Some(readme_outcome(
        context,
        owner,
        &[
            "README contact suggests an individual owner, but the CODEOWNERS global rule points to a different owner.",
            "README is preferred when no team is declared; ownership should be clarified.",
        ],
        "Resolved owner from README contact (no owning team declared).",
    ))
}

/// Shared README branch: conflict against the first CODEOWNERS candidate,
/// otherwise `ok` / `multi_owner`.
fn readme_outcome(
    context: &ResolutionContext<'_>,
    owner: &OwnerRef,
    conflict_notes: &[&str],
    ok_note: &str,
) -> ResolvedOwnership {
    let conflicting = context
        .codeowners
        .owner_candidates
        .first()
        .is_some_and(|co_owner| !owners_overlap(owner, co_owner));

    if conflicting {
        context.resolved(OwnershipStatus::Conflict, owner, conflict_notes)
    } else {
        context.resolved(context.count_status(), owner, &[ok_note])
    }
}

fn codeowners_team(context: &ResolutionContext<'_>) -> Option<ResolvedOwnership> {
    let owner = context.codeowners_candidate(OwnerKind::Team)?;
    Some(context.resolved(
        context.count_status(),
        owner,
        &["Resolved owner from CODEOWNERS global rule (team handle)."],
    ))
}

fn codeowners_person(context: &ResolutionContext<'_>) -> Option<ResolvedOwnership> {
    let owner = context.codeowners_candidate(OwnerKind::Person)?;
    Some(context.resolved(
        context.count_status(),
        owner,
        &["Resolved owner from CODEOWNERS global rule (individual handle)."],
    ))
}

fn readme_placeholder(context: &ResolutionContext<'_>) -> Option<ResolvedOwnership> {
    if !context.readme.has_placeholders {
        return None;
    }
    Some(context.resolved(
        OwnershipStatus::Placeholder,
        &OwnerRef::unknown(context.readme.sources.clone()),
        &["README ownership appears to be placeholders."],
    ))
}

fn no_metadata(context: &ResolutionContext<'_>) -> ResolvedOwnership {
    let sources = context
        .readme
        .sources
        .iter()
        .chain(context.codeowners.sources.iter())
        .cloned()
        .collect();
    context.resolved(
        OwnershipStatus::Unknown,
        &OwnerRef::unknown(sources),
        &["No ownership metadata found in README Ownership section or CODEOWNERS global rule."],
    )
}
