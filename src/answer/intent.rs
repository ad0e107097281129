use super::types::Intent;
use std::collections::HashMap;

/// Messy labels the model tends to emit, keyed by their collapsed form.
const NORMALIZATION_TABLE: &[(&str, Intent)] = &[
    ("experience", Intent::ExperienceSummary),
    ("whyfit", Intent::WhyFit),
    ("personal.additionalinfo", Intent::AdditionalInfo),
    ("additionalinfo", Intent::AdditionalInfo),
    ("salary", Intent::DesiredSalary),
    ("personal.salary", Intent::DesiredSalary),
    ("personal.desiredsalary", Intent::DesiredSalary),
];

const SALARY_KEYWORDS: &[&str] = &["salary", "compensation", "pay"];
const ADDITIONAL_INFO_KEYWORDS: &[&str] = &["anything else", "additional", "know about you"];
const WHY_FIT_KEYWORDS: &[&str] = &["strong fit", "why you", "why should we hire"];

/// Maps a raw intent label (and the question, as a backup signal) onto the
/// closed intent set. Never fails: the worst case is [`Intent::Unknown`].
#[derive(Debug, Clone)]
pub struct IntentNormalizer {
    table: HashMap<String, Intent>,
}

impl Default for IntentNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentNormalizer {
    pub fn new() -> Self {
        let mut table: HashMap<String, Intent> = NORMALIZATION_TABLE
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();

        // Canonical labels in the wrong case ("Personal.Email") resolve too.
        for intent in Intent::ALL {
            table.entry(collapse(intent.as_str())).or_insert(intent);
        }

        Self { table }
    }

    /// First match wins: exact label, normalization table, question keywords.
    pub fn normalize(&self, raw: Option<&str>, question: &str) -> Intent {
        let raw = raw.unwrap_or("").trim();

        // 1. Exact member of the allowed set
        if let Some(intent) = Intent::parse(raw) {
            return intent;
        }

        // 2. Collapsed lookup
        if let Some(intent) = self.table.get(&collapse(raw)) {
            return *intent;
        }

        // 3. Heuristics over the question text
        Self::infer_from_question(question)
    }

    /// Keyword scan used when the label itself is useless.
    /// Plain substring checks: "pay" also fires on "paypal".
    pub fn infer_from_question(question: &str) -> Intent {
        let q = question.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| q.contains(w));

        if has_any(SALARY_KEYWORDS) {
            Intent::DesiredSalary
        } else if has_any(ADDITIONAL_INFO_KEYWORDS) {
            Intent::AdditionalInfo
        } else if has_any(WHY_FIT_KEYWORDS) {
            Intent::WhyFit
        } else {
            Intent::Unknown
        }
    }

    pub fn table_len(&self) -> usize {
        self.table.len()
    }
}

/// Lowercase and drop spaces, hyphens and underscores.
fn collapse(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
