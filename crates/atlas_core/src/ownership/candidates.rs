//! Candidate deduplication and overlap.

use crate::model::owner::OwnerRef;
use std::collections::HashSet;

/// Removes duplicate candidates, keeping the first occurrence of each key.
///
/// Keys are case-insensitive: the unknown sentinel collapses to one key,
/// other owners key on kind plus handles (or display when handle-less).
pub fn dedupe_owners(owners: &[OwnerRef]) -> Vec<OwnerRef> {
    let mut seen = HashSet::new();
    owners
        .iter()
        .filter(|owner| seen.insert(dedupe_key(owner)))
        .cloned()
        .collect()
}

fn dedupe_key(owner: &OwnerRef) -> String {
    if owner.is_unknown() {
        return "unknown".to_string();
    }
    let body = if owner.handles().is_empty() {
        owner.display().to_string()
    } else {
        owner.handles().join(",")
    };
    format!("{}:{}", owner.kind(), body.to_lowercase())
}

/// Whether two candidates denote the same real-world owner.
///
/// True when any handle matches case-insensitively, or when both are
/// handle-less and their trimmed displays match case-insensitively. The
/// unknown sentinel never overlaps anything.
pub fn owners_overlap(a: &OwnerRef, b: &OwnerRef) -> bool {
    if a.is_unknown() || b.is_unknown() {
        return false;
    }

    let a_handles: HashSet<String> = a.handles().iter().map(|h| h.to_lowercase()).collect();
    if b
        .handles()
        .iter()
        .any(|h| a_handles.contains(&h.to_lowercase()))
    {
        return true;
    }

    a.handles().is_empty()
        && b.handles().is_empty()
        && a.display().trim().to_lowercase() == b.display().trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{dedupe_owners, owners_overlap};
    use crate::model::owner::{Confidence, OwnerRef};

    fn team(display: &str, handles: &[&str]) -> OwnerRef {
        OwnerRef::team(
            display,
            handles.iter().map(|h| h.to_string()).collect(),
            Confidence::Medium,
            Vec::new(),
        )
    }

    fn person(handle: &str) -> OwnerRef {
        OwnerRef::person(handle, vec![handle.to_string()], Confidence::Low, Vec::new())
    }

    #[test]
    fn dedupe_collapses_case_insensitive_handles() {
        let owners = vec![
            team("Core", &["@Org/Team"]),
            team("@org/team", &["@org/team"]),
            person("@alice"),
        ];
        let deduped = dedupe_owners(&owners);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].display(), "Core");
        assert_eq!(deduped[1].display(), "@alice");
    }

    #[test]
    fn dedupe_keys_on_kind() {
        let owners = vec![
            team("alice", &[]),
            OwnerRef::person("alice", Vec::new(), Confidence::Low, Vec::new()),
        ];
        assert_eq!(dedupe_owners(&owners).len(), 2);
    }

    #[test]
    fn dedupe_collapses_unknown_sentinels() {
        let owners = vec![
            OwnerRef::unknown(Vec::new()),
            person("@a"),
            OwnerRef::unknown(Vec::new()),
        ];
        let deduped = dedupe_owners(&owners);
        assert_eq!(deduped.len(), 2);
        assert!(deduped[0].is_unknown());
    }

    #[test]
    fn dedupe_is_idempotent_and_never_grows() {
        let owners = vec![
            team("A", &["@org/a"]),
            team("a", &["@ORG/A"]),
            team("Team B", &[]),
            team("team b", &[]),
            person("@c"),
            OwnerRef::unknown(Vec::new()),
            person("@C"),
        ];
        let once = dedupe_owners(&owners);
        let twice = dedupe_owners(&once);
        assert!(once.len() <= owners.len());
        assert_eq!(once, twice);
        assert_eq!(
            once.iter().map(|o| o.display()).collect::<Vec<_>>(),
            vec!["A", "Team B", "@c", "unknown"]
        );
    }

    #[test]
    fn overlap_on_shared_handle_ignores_case() {
        assert!(owners_overlap(
            &team("Core", &["@org/core", "@org/x"]),
            &team("@ORG/CORE", &["@ORG/CORE"])
        ));
    }

    #[test]
    fn overlap_on_display_only_when_both_handle_less() {
        assert!(owners_overlap(&team(" Team Core ", &[]), &team("team core", &[])));
        assert!(!owners_overlap(&team("Team Core", &[]), &team("Team Core", &["@org/core"])));
    }

    #[test]
    fn disjoint_handles_and_displays_never_overlap() {
        assert!(!owners_overlap(&team("A", &["@org/a"]), &team("B", &["@org/b"])));
        assert!(!owners_overlap(&person("@a"), &team("B", &["@org/b"])));
    }

    #[test]
    fn unknown_never_overlaps() {
        let unknown = OwnerRef::unknown(Vec::new());
        assert!(!owners_overlap(&unknown, &unknown));
        assert!(!owners_overlap(&unknown, &team("A", &[])));
    }
}
