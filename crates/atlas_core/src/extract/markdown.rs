//! Markdown section and bold-field extraction.

use once_cell::sync::Lazy;
use regex::Regex;

static SECTION_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{2,6}\s+").expect("valid heading regex"));

/// Compiles the heading matcher for a section named `heading`.
pub fn section_heading_regex(heading: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?i)^#{{2,6}}\s+{}\s*$",
        regex::escape(heading.trim())
    ))
}

/// Compiles the matcher for a `**Field**: value` line.
///
/// Case-insensitive and tolerant of whitespace; the colon may sit inside or
/// outside the bold markers (`**Owning team:** x` and `**Owning team**: x`).
pub fn bold_field_regex(field: &str) -> Result<Regex, regex::Error> {
    let field_pattern = regex::escape(field.trim()).replace(' ', r"\s+");
    Regex::new(&format!(
        r"(?i)\*\*\s*{field_pattern}\s*(?::\s*\*\*|\*\*\s*:)\s*(.+)$"
    ))
}

/// Returns the text under the first `##`..`######` heading named `heading`.
///
/// The block runs until the next level 2-6 heading or the end of the
/// document and is returned trimmed. Headings inside fenced code blocks are
/// ignored. Returns `None` when no matching heading exists.
pub fn extract_markdown_section(markdown: &str, heading: &str) -> Option<String> {
    let heading_re = section_heading_regex(heading).ok()?;
    extract_section_matching(markdown, &heading_re)
}

/// Same as [`extract_markdown_section`] with a prebuilt heading matcher.
pub fn extract_section_matching(markdown: &str, heading_re: &Regex) -> Option<String> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut in_fence = false;
    let mut start = None;

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if is_fence_delimiter(trimmed) {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence && heading_re.is_match(trimmed) {
            start = Some(index + 1);
            break;
        }
    }
    let start = start?;

    let mut end = lines.len();
    in_fence = false;
    for (offset, line) in lines[start..].iter().enumerate() {
        let trimmed = line.trim();
        if is_fence_delimiter(trimmed) {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence && SECTION_HEADING_RE.is_match(trimmed) {
            end = start + offset;
            break;
        }
    }

    Some(lines[start..end].join("\n").trim().to_string())
}

/// Extracts the value of a `**Field**: value` style line.
///
/// Returns `None` when the field is absent or its value is blank.
pub fn extract_bold_field_value(line: &str, field: &str) -> Option<String> {
    let field_re = bold_field_regex(field).ok()?;
    extract_bold_field_matching(line, &field_re)
}

/// Same as [`extract_bold_field_value`] with a prebuilt field matcher.
pub fn extract_bold_field_matching(line: &str, field_re: &Regex) -> Option<String> {
    let value = field_re.captures(line)?.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn is_fence_delimiter(trimmed_line: &str) -> bool {
    trimmed_line.starts_with("```") || trimmed_line.starts_with("~~~")
}
