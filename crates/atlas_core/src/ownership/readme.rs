//! README "Ownership" section candidate builder.
//!
//! Expected template:
//!
//! ```text
//! ## Ownership
//!
//! - **Owning team:** <team-name>
//! - **Contact:** #team-channel or @handle
//! ```

use crate::extract::handles::{extract_handles, is_person_handle, is_placeholder, is_team_handle};
use crate::extract::markdown::{
    bold_field_regex, extract_bold_field_matching, extract_section_matching,
    section_heading_regex,
};
use crate::model::owner::{Confidence, OwnerRef, SourceRef, SourceType};
use crate::model::ownership::ReadmeOwnership;
use crate::ownership::candidates::dedupe_owners;
use once_cell::sync::Lazy;
use regex::Regex;

/// Heading of the README ownership section.
pub const OWNERSHIP_HEADING: &str = "Ownership";

static OWNING_TEAM_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Owning\s*team").expect("valid owning team regex"));
static CONTACT_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Contact").expect("valid contact regex"));
static OWNERSHIP_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| section_heading_regex(OWNERSHIP_HEADING).expect("valid ownership heading regex"));
static OWNING_TEAM_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| bold_field_regex("Owning team").expect("valid owning team field regex"));
static CONTACT_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| bold_field_regex("Contact").expect("valid contact field regex"));

/// Location label used for every fact taken from the README section.
pub fn readme_section_location(readme_path: &str) -> String {
    format!("{readme_path}#{OWNERSHIP_HEADING}")
}

/// Builds README owner candidates.
///
/// A missing or empty ownership section yields an empty result, not an error.
pub fn parse_readme_ownership(readme_text: &str, readme_path: &str) -> ReadmeOwnership {
    let empty = ReadmeOwnership {
        path: readme_path.to_string(),
        ..ReadmeOwnership::default()
    };
    let Some(section) = extract_section_matching(readme_text, &OWNERSHIP_HEADING_RE) else {
        return empty;
    };
    if section.is_empty() {
        return empty;
    }

    let location = readme_section_location(readme_path);
    let lines: Vec<&str> = section.lines().map(str::trim).collect();
    let owning_team_line = lines.iter().find(|l| OWNING_TEAM_LINE_RE.is_match(l));
    let contact_line = lines.iter().find(|l| CONTACT_LINE_RE.is_match(l));

    let owning_team_raw =
        owning_team_line.and_then(|line| extract_bold_field_matching(line, &OWNING_TEAM_FIELD_RE));
    let contact_raw =
        contact_line.and_then(|line| extract_bold_field_matching(line, &CONTACT_FIELD_RE));

    let has_placeholders = owning_team_raw.as_deref().is_some_and(is_placeholder)
        || contact_raw.as_deref().is_some_and(is_placeholder);

    let sources: Vec<SourceRef> = [owning_team_line, contact_line]
        .into_iter()
        .flatten()
        .map(|line| SourceRef::new(SourceType::Readme, location.clone(), *line))
        .collect();

    let section_sources = || {
        vec![SourceRef::new(
            SourceType::Readme,
            location.clone(),
            section.clone(),
        )]
    };
    let usable = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !is_placeholder(v))
            .map(str::to_string)
    };

    let mut candidates = Vec::new();
    if let Some(team_text) = usable(&owning_team_raw) {
        let handles = extract_handles(&team_text);
        candidates.push(OwnerRef::team(
            team_text.trim(),
            handles,
            Confidence::High,
            section_sources(),
        ));
    } else if let Some(contact_text) = usable(&contact_raw) {
        // First class wins: a team handle anywhere outranks person handles.
        let handles = extract_handles(&contact_text);
        let team_handles: Vec<String> =
            handles.iter().filter(|h| is_team_handle(h)).cloned().collect();
        let person_handles: Vec<String> =
            handles.iter().filter(|h| is_person_handle(h)).cloned().collect();

        if let Some(first) = team_handles.first().cloned() {
            candidates.push(OwnerRef::team(
                first,
                team_handles,
                Confidence::Medium,
                section_sources(),
            ));
        } else if let Some(first) = person_handles.first().cloned() {
            candidates.push(OwnerRef::person(
                first,
                person_handles,
                Confidence::Medium,
                section_sources(),
            ));
        }
    }

    ReadmeOwnership {
        path: readme_path.to_string(),
        owning_team_raw,
        contact_raw,
        owner_candidates: dedupe_owners(&candidates),
        sources,
        has_placeholders,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_readme_ownership;
    use crate::model::owner::{Confidence, OwnerKind, SourceType};

    #[test]
    fn owning_team_yields_high_confidence_team() {
        let readme = "## Ownership\n- **Owning team:** Team Platform Core\n- **Contact:** @org/team-platform-core\n";
        let result = parse_readme_ownership(readme, "README.md");

        assert_eq!(result.owning_team_raw.as_deref(), Some("Team Platform Core"));
        assert_eq!(result.contact_raw.as_deref(), Some("@org/team-platform-core"));
        assert!(!result.has_placeholders);
        assert_eq!(result.owner_candidates.len(), 1);
        let owner = &result.owner_candidates[0];
        assert_eq!(owner.kind(), OwnerKind::Team);
        assert_eq!(owner.display(), "Team Platform Core");
        assert!(owner.handles().is_empty());
        assert_eq!(owner.confidence(), Confidence::High);
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].kind, SourceType::Readme);
        assert_eq!(result.sources[0].location, "README.md#Ownership");
    }

    #[test]
    fn owning_team_keeps_only_team_handles() {
        let readme = "## Ownership\n- **Owning team:** Core (@org/core, lead @alice)\n";
        let result = parse_readme_ownership(readme, "README.md");
        assert_eq!(result.owner_candidates[0].handles(), ["@org/core".to_string()]);
    }

    #[test]
    fn unfilled_team_without_contact_is_placeholder() {
        let readme = "## Ownership\n\n- **Owning team:** <team-name>\n";
        let result = parse_readme_ownership(readme, "README.md");
        assert!(result.owner_candidates.is_empty());
        assert!(result.has_placeholders);
        assert_eq!(result.owning_team_raw.as_deref(), Some("<team-name>"));
    }

    #[test]
    fn contact_fallback_prefers_team_handle() {
        let readme = "## Ownership\n- **Owning team:** TBD\n- **Contact:** @alice or @org/infra\n";
        let result = parse_readme_ownership(readme, "README.md");
        assert!(result.has_placeholders);
        assert_eq!(result.owner_candidates.len(), 1);
        let owner = &result.owner_candidates[0];
        assert_eq!(owner.kind(), OwnerKind::Team);
        assert_eq!(owner.display(), "@org/infra");
        assert_eq!(owner.confidence(), Confidence::Medium);
    }

    #[test]
    fn contact_fallback_uses_first_person_handle() {
        let readme = "## Ownership\n- **Contact:** @alice, @bob\n";
        let result = parse_readme_ownership(readme, "docs/README.md");
        let owner = &result.owner_candidates[0];
        assert_eq!(owner.kind(), OwnerKind::Person);
        assert_eq!(owner.display(), "@alice");
        assert_eq!(owner.handles(), ["@alice".to_string(), "@bob".to_string()]);
        assert_eq!(owner.sources()[0].location, "docs/README.md#Ownership");
    }

    #[test]
    fn contact_without_handles_yields_nothing() {
        let readme = "## Ownership\n- **Contact:** #team-channel\n";
        let result = parse_readme_ownership(readme, "README.md");
        assert!(result.owner_candidates.is_empty());
        assert!(!result.has_placeholders);
    }

    #[test]
    fn missing_section_is_an_empty_result() {
        let result = parse_readme_ownership("# Title\n\nNo ownership here.", "README.md");
        assert!(result.owner_candidates.is_empty());
        assert!(result.sources.is_empty());
        assert!(!result.has_placeholders);
        assert_eq!(result.owning_team_raw, None);
    }
}
