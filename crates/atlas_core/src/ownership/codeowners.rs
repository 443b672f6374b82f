//! CODEOWNERS candidate builder.
//!
//! Only the global rule speaks for the whole repository; path-scoped rules
//! are never promoted, so a file without a catch-all produces no candidate.

use crate::extract::codeowners::{parse_codeowners_rules, pick_global_rule};
use crate::extract::handles::{is_person_handle, is_team_handle};
use crate::model::owner::{Confidence, OwnerRef, SourceRef, SourceType};
use crate::model::ownership::{CodeownersOwnership, GlobalRule};
use crate::ownership::candidates::dedupe_owners;

/// Builds CODEOWNERS owner candidates from the global rule.
pub fn parse_codeowners_ownership(
    codeowners_text: &str,
    codeowners_path: &str,
) -> CodeownersOwnership {
    let rules = parse_codeowners_rules(codeowners_text);
    let Some(rule) = pick_global_rule(&rules) else {
        return CodeownersOwnership {
            path: codeowners_path.to_string(),
            ..CodeownersOwnership::default()
        };
    };

    let source = SourceRef::new(
        SourceType::Codeowners,
        format!("{codeowners_path}:line {}", rule.line),
        rule.raw.as_str(),
    );

    let team_handles: Vec<String> = rule
        .owners
        .iter()
        .filter(|token| is_team_handle(token))
        .cloned()
        .collect();
    let person_handles: Vec<String> = rule
        .owners
        .iter()
        .filter(|token| is_person_handle(token))
        .cloned()
        .collect();

    let mut candidates = Vec::new();
    if let Some(first) = team_handles.first().cloned() {
        candidates.push(OwnerRef::team(
            first,
            team_handles,
            Confidence::Medium,
            vec![source.clone()],
        ));
    } else if let Some(first) = person_handles.first().cloned() {
        candidates.push(OwnerRef::person(
            first,
            person_handles,
            Confidence::Low,
            vec![source.clone()],
        ));
    }

    CodeownersOwnership {
        path: codeowners_path.to_string(),
        global_rule: Some(GlobalRule::from(rule)),
        owner_candidates: dedupe_owners(&candidates),
        sources: vec![source],
    }
}

#[cfg(test)]
mod tests {
    use super::parse_codeowners_ownership;
    use crate::model::owner::{Confidence, OwnerKind};

    #[test]
    fn star_rule_beats_scoped_rule() {
        let result =
            parse_codeowners_ownership("* @org/team-core\n/docs/** @org/team-docs", ".github/CODEOWNERS");
        let rule = result.global_rule.expect("global rule");
        assert_eq!(rule.pattern, "*");
        assert_eq!(rule.line, 1);
        assert_eq!(result.owner_candidates.len(), 1);
        let owner = &result.owner_candidates[0];
        assert_eq!(owner.kind(), OwnerKind::Team);
        assert_eq!(owner.display(), "@org/team-core");
        assert_eq!(owner.confidence(), Confidence::Medium);
        assert_eq!(result.sources[0].location, ".github/CODEOWNERS:line 1");
        assert_eq!(result.sources[0].extracted, "* @org/team-core");
    }

    #[test]
    fn team_handles_win_over_people_on_the_global_rule() {
        let result = parse_codeowners_ownership("* @alice @org/core @org/ops", "CODEOWNERS");
        let owner = &result.owner_candidates[0];
        assert_eq!(owner.kind(), OwnerKind::Team);
        assert_eq!(owner.handles(), ["@org/core".to_string(), "@org/ops".to_string()]);
    }

    #[test]
    fn people_only_rule_is_low_confidence_person() {
        let result = parse_codeowners_ownership("# owners\n/** @alice @bob # leads\n", "CODEOWNERS");
        let owner = &result.owner_candidates[0];
        assert_eq!(owner.kind(), OwnerKind::Person);
        assert_eq!(owner.display(), "@alice");
        assert_eq!(owner.confidence(), Confidence::Low);
        assert_eq!(result.global_rule.expect("global rule").line, 2);
    }

    #[test]
    fn email_owners_produce_no_candidate_but_keep_rule() {
        let result = parse_codeowners_ownership("* dev@example.com", "CODEOWNERS");
        assert!(result.global_rule.is_some());
        assert!(result.owner_candidates.is_empty());
        assert_eq!(result.sources.len(), 1);
    }

    #[test]
    fn no_global_rule_means_no_candidates() {
        let result = parse_codeowners_ownership("/docs/ @org/docs\n*.rs @org/rust\n", "CODEOWNERS");
        assert!(result.global_rule.is_none());
        assert!(result.owner_candidates.is_empty());
        assert!(result.sources.is_empty());
    }
}
