//! CODEOWNERS rule tokenization and global-rule selection.

use crate::model::ownership::CodeownersRule;
use once_cell::sync::Lazy;
use regex::Regex;

static INLINE_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s#").expect("valid inline comment regex"));

/// Root patterns accepted as a global rule when no exact `*` rule exists.
const BROAD_ROOT_PATTERNS: &[&str] = &["/*", "/**", "/"];

/// Tokenizes CODEOWNERS text into `pattern owner...` rules.
///
/// Blank lines, comment lines and lines with fewer than two tokens are
/// skipped without error.
pub fn parse_codeowners_rules(text: &str) -> Vec<CodeownersRule> {
    text.lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }

            let mut tokens = strip_inline_comment(trimmed).split_whitespace();
            let pattern = tokens.next()?;
            let owners: Vec<String> = tokens.map(str::to_string).collect();
            if owners.is_empty() {
                return None;
            }

            Some(CodeownersRule {
                pattern: pattern.to_string(),
                owners,
                line: index + 1,
                raw: raw.to_string(),
            })
        })
        .collect()
}

/// Drops a trailing comment introduced by whitespace followed by `#`.
///
/// A `#` glued to a pattern (`docs/#legacy`) is kept.
pub fn strip_inline_comment(line: &str) -> &str {
    match INLINE_COMMENT_RE.find(line) {
        Some(m) => line[..m.start()].trim_end(),
        None => line,
    }
}

/// Picks the repository-wide rule: exact `*` first, then the first broad
/// root pattern. Narrower patterns never qualify.
pub fn pick_global_rule(rules: &[CodeownersRule]) -> Option<&CodeownersRule> {
    rules
        .iter()
        .find(|rule| rule.pattern == "*")
        .or_else(|| {
            rules
                .iter()
                .find(|rule| BROAD_ROOT_PATTERNS.contains(&rule.pattern.as_str()))
        })
}
