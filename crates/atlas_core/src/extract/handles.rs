//! `@handle` extraction, handle classification and placeholder detection.
//!
//! # Invariants
//! - `is_team_handle` and `is_person_handle` are never both true.
//! - Every handle returned by `extract_handles` satisfies exactly one of them.

use once_cell::sync::Lazy;
use regex::Regex;

static HANDLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@[A-Za-z0-9_.-]+(?:/[A-Za-z0-9_.-]+)?").expect("valid handle regex")
});
static TRAILING_PUNCTUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,;:)\]]+$").expect("valid punctuation regex"));
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:<[^>]+>|tbd|todo|unknown|n/a|null|none)$")
        .expect("valid placeholder regex")
});

/// Extracts every `@name` or `@org/team` handle in order of appearance.
///
/// Trailing punctuation is trimmed, so `@org/team,` yields `@org/team`.
pub fn extract_handles(text: &str) -> Vec<String> {
    HANDLE_RE
        .find_iter(text)
        .map(|m| TRAILING_PUNCTUATION_RE.replace(m.as_str(), "").into_owned())
        .filter(|handle| handle.len() > 1)
        .collect()
}

/// `@org/team` style handle.
pub fn is_team_handle(handle: &str) -> bool {
    handle.starts_with('@') && handle.contains('/')
}

/// `@name` style handle.
pub fn is_person_handle(handle: &str) -> bool {
    handle.starts_with('@') && !handle.contains('/')
}

/// Whether a field value is unfilled template text (`<team-name>`, `TBD`, ...).
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_RE.is_match(value.trim())
}

#[cfg(test)]
mod tests {
    use super::{extract_handles, is_person_handle, is_placeholder, is_team_handle};

    #[test]
    fn extracts_team_and_person_handles_in_order() {
        let handles = extract_handles("Ping @org/team-core, or @alice; (@bob) / @org/x.");
        assert_eq!(handles, vec!["@org/team-core", "@alice", "@bob", "@org/x"]);
    }

    #[test]
    fn text_without_handles_yields_nothing() {
        assert!(extract_handles("#team-channel on slack").is_empty());
        assert!(extract_handles("").is_empty());
    }

    #[test]
    fn handle_predicates_partition_handles() {
        for handle in extract_handles("@org/a @b @c.d @org/e_f") {
            assert_ne!(is_team_handle(&handle), is_person_handle(&handle));
        }
        assert!(is_team_handle("@org/a"));
        assert!(is_person_handle("@alice"));
        assert!(!is_team_handle("org/a"));
        assert!(!is_person_handle("alice"));
    }

    #[test]
    fn placeholder_matches_closed_set_only() {
        for value in ["<team-name>", " TBD ", "todo", "Unknown", "N/A", "null", "NONE"] {
            assert!(is_placeholder(value), "{value} should be a placeholder");
        }
        for value in ["Team Core", "none yet", "<a> b", "@org/tbd", ""] {
            assert!(!is_placeholder(value), "{value} should not be a placeholder");
        }
    }
}
