//! Heuristic answer validation.

use regex::RegexSet;
use std::sync::LazyLock;

/// Answers shorter than this many characters (after trimming) are rejected.
pub const MIN_ANSWER_LENGTH: usize = 10;

/// Case-insensitive refusal phrasings, English and Turkish.
static REFUSAL_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)no information (was )?found",
        r"(?i)could(n't| not) find (this|that|it|any)",
        r"(?i)not a valid answer",
        r"(?i)(do not|don't) have (enough )?information",
        r"(?i)not enough information",
        r"(?i)bulamad[ıi]m",
        r"(?i)bilgi (bulunamad[ıi]|yok)",
        r"(?i)^\s*FALSE\s*-",
    ])
    .expect("refusal patterns are valid regular expressions")
});

static VALID_MARKER: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?i)^\s*TRUE\s*-\s*").expect("marker pattern is a valid regular expression")
});

/// Decides whether a generated answer is usable.
///
/// Pure: the same text always yields the same verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerValidator;

impl AnswerValidator {
    /// Returns `false` for short answers and refusal phrasing.
    #[must_use]
    pub fn is_valid(&self, answer: &str) -> bool {
        is_valid(answer)
    }
}

/// Returns `false` for short answers and refusal phrasing.
///
/// ```
/// use docent_answer::is_valid;
///
/// assert!(!is_valid("too short"));
/// assert!(!is_valid("FALSE - the page does not say."));
/// assert!(is_valid("Install it with the package manager."));
/// ```
#[must_use]
pub fn is_valid(answer: &str) -> bool {
    let trimmed = answer.trim();
    if trimmed.chars().count() < MIN_ANSWER_LENGTH {
        return false;
    }
    !REFUSAL_PATTERNS.is_match(trimmed)
}

/// Removes a leading `TRUE -` marker the default persona asks for.
#[must_use]
pub fn strip_validity_marker(answer: &str) -> &str {
    match VALID_MARKER.find(answer) {
        Some(marker) => &answer[marker.end()..],
        None => answer,
    }
}
