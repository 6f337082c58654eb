use super::bytes::first_mismatch_offset;
use super::{CompareError, not_equivalent, read_text};
use crate::domain::ComparatorKind;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

const CONTEXT_CHARS: usize = 40;

static COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern should compile"));
static META_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+name\s*=\s*"date"[^>]*>"#).expect("meta date pattern should compile")
});
static RMARKDOWN_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<h4\s+class\s*=\s*"date"[^>]*>.*?</h4>"#)
        .expect("rmarkdown date pattern should compile")
});
static TIMESTAMPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?",
    )
    .expect("timestamp pattern should compile")
});
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern should compile"));

/// Strips run-specific content from a rendered report.
pub fn normalize_html(html: &str) -> String {
    let text = COMMENTS.replace_all(html, "");
    let text = META_DATE.replace_all(&text, "");
    let text = RMARKDOWN_DATE.replace_all(&text, "");
    let text = TIMESTAMPS.replace_all(&text, "<timestamp>");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

pub fn compare_html(expected: &Path, actual: &Path) -> Result<(), CompareError> {
    let expected_text = normalize_html(&read_text(expected)?);
    let actual_text = normalize_html(&read_text(actual)?);

    match first_mismatch_offset(expected_text.as_bytes(), actual_text.as_bytes()) {
        None => Ok(()),
        Some(offset) => Err(not_equivalent(
            ComparatorKind::Html,
            expected,
            actual,
            format!(
                "normalized content differs at offset {} (expected '{}', actual '{}')",
                offset,
                excerpt(&expected_text, offset),
                excerpt(&actual_text, offset)
            ),
        )),
    }
}

fn excerpt(text: &str, offset: usize) -> String {
    let mut start = offset.min(text.len());
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    text[start..].chars().take(CONTEXT_CHARS).collect()
}
