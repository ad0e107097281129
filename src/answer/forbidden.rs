use regex::{Regex, RegexBuilder};

/// Placeholder phrases that must never reach the form.
pub const FORBIDDEN_PATTERNS: &[&str] = &[
    r"\bnot provided\b",
    r"\bi don['’]t know\b",
    r"\bdo not know\b",
    r"\bn/?a\b",
    r"\bfree text input\b",
    r"\bno additional information\b",
    r"\bnothing to add\b",
    r"\bnot sure\b",
];

/// Flags non-answers ("Not provided", "N/A", "I don't know", ...).
#[derive(Debug, Clone)]
pub struct ForbiddenAnswerDetector {
    patterns: Vec<Regex>,
}

impl Default for ForbiddenAnswerDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ForbiddenAnswerDetector {
    pub fn new() -> Self {
        let patterns = FORBIDDEN_PATTERNS
            .iter()
            .filter_map(|p| RegexBuilder::new(p).case_insensitive(true).build().ok())
            .collect();
        Self { patterns }
    }

    /// Empty (after trimming) is always forbidden.
    pub fn is_forbidden(&self, answer: &str) -> bool {
        let s = answer.trim().to_lowercase();
        if s.is_empty() {
            return true;
        }
        self.patterns.iter().any(|re| re.is_match(&s))
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}
