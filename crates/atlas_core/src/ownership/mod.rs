//! Ownership resolution engine.
//!
//! # Responsibility
//! - Turn README and CODEOWNERS text into ranked owner candidates.
//! - Reconcile both candidate sets into one explained decision.
//!
//! # Invariants
//! - Every function here is pure: no I/O, no shared state, safe to run in
//!   parallel across repositories.
//! - Missing input text is a normal state and resolves to `unknown` or
//!   `placeholder`, never to an error.

pub mod candidates;
pub mod codeowners;
pub mod readme;
pub mod resolve;

use crate::model::ownership::OwnershipParseResult;
use codeowners::parse_codeowners_ownership;
use readme::parse_readme_ownership;
use resolve::resolve_ownership;

/// Default README path label.
pub const DEFAULT_README_PATH: &str = "README.md";
/// Default CODEOWNERS path label.
pub const DEFAULT_CODEOWNERS_PATH: &str = ".github/CODEOWNERS";

/// Raw text for one repository as handed over by the fetch layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipInput<'a> {
    pub readme_text: Option<&'a str>,
    pub readme_path: Option<&'a str>,
    pub codeowners_text: Option<&'a str>,
    pub codeowners_path: Option<&'a str>,
}

/// Runs both candidate builders and the resolver for one repository.
pub fn parse_ownership(input: &OwnershipInput<'_>) -> OwnershipParseResult {
    let readme = parse_readme_ownership(
        input.readme_text.unwrap_or_default(),
        input.readme_path.unwrap_or(DEFAULT_README_PATH),
    );
    let codeowners = parse_codeowners_ownership(
        input.codeowners_text.unwrap_or_default(),
        input.codeowners_path.unwrap_or(DEFAULT_CODEOWNERS_PATH),
    );
    let resolved = resolve_ownership(&readme, &codeowners);

    OwnershipParseResult {
        readme,
        codeowners,
        resolved,
    }
}
