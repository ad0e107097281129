use super::repair::AnswerRepairer;
use super::types::Intent;
use super::REPAIR_CONFIDENCE_FLOOR;

/// Canonical option token -> tokens that mean the same thing.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("male", &["man", "cisgender male", "cis male"]),
    ("female", &["woman", "cisgender female", "cis female"]),
    ("man", &["male", "cisgender male", "cis male"]),
    ("woman", &["female", "cisgender female", "cis female"]),
    (
        "non-binary",
        &[
            "nonbinary",
            "genderqueer",
            "gender non-conforming",
            "gender non-binary",
            "non-binary/non-conforming",
        ],
    ),
    ("yes", &["y", "true", "i do", "authorized"]),
    ("no", &["n", "false", "i do not", "not authorized"]),
];

/// Which rule reconciled the answer with the option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionResolution {
    Exact,
    CaseInsensitive,
    Synonym,
    Substring,
    Repaired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionMatch {
    pub answer: String,
    pub resolution: OptionResolution,
    /// Set only on the repair path.
    pub confidence_floor: Option<f64>,
}

impl OptionMatch {
    fn resolved(answer: &str, resolution: OptionResolution) -> Self {
        Self {
            answer: answer.to_string(),
            resolution,
            confidence_floor: None,
        }
    }

    /// Confidence after applying the floor, if any.
    pub fn adjust(&self, confidence: f64) -> f64 {
        match self.confidence_floor {
            Some(floor) => confidence.max(floor),
            None => confidence,
        }
    }
}

/// Reconciles free text from the model against a dropdown / radio list.
#[derive(Debug, Clone)]
pub struct OptionMatcher {
    synonyms: Vec<(&'static str, &'static [&'static str])>,
    repairer: AnswerRepairer,
}

impl Default for OptionMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionMatcher {
    pub fn new() -> Self {
        Self {
            synonyms: SYNONYMS.to_vec(),
            repairer: AnswerRepairer::new(),
        }
    }

    /// Resolution order: exact, case-insensitive, synonym, substring, repair.
    /// An empty option list leaves the answer untouched.
    pub fn resolve(&self, answer: &str, options: &[String], intent: Intent, question: &str) -> OptionMatch {
        if options.is_empty() || options.iter().any(|o| o == answer) {
            return OptionMatch::resolved(answer, OptionResolution::Exact);
        }

        let needle = answer.trim().to_lowercase();
        let lowered: Vec<String> = options.iter().map(|o| o.trim().to_lowercase()).collect();

        // 1. Case-insensitive
        if let Some(i) = lowered.iter().position(|o| *o == needle) {
            return OptionMatch::resolved(&options[i], OptionResolution::CaseInsensitive);
        }

        // 2. Synonyms
        for candidate in self.synonym_candidates(&needle) {
            if let Some(i) = lowered.iter().position(|o| o == candidate) {
                return OptionMatch::resolved(&options[i], OptionResolution::Synonym);
            }
        }

        // 3. Containment either way. First in list order wins, so a short
        // answer like "no" will happily land on "Norway".
        let raw_lower = answer.to_lowercase();
        if let Some(i) = lowered
            .iter()
            .position(|o| raw_lower.contains(o.as_str()) || o.contains(raw_lower.as_str()))
        {
            return OptionMatch::resolved(&options[i], OptionResolution::Substring);
        }

        // 4. Give up and repair
        OptionMatch {
            answer: self.repairer.repair(question, Some(options), intent),
            resolution: OptionResolution::Repaired,
            confidence_floor: Some(REPAIR_CONFIDENCE_FLOOR),
        }
    }

    /// Tokens equivalent to `needle`: its own synonyms first, then any
    /// canonical entry listing it as a synonym.
    fn synonym_candidates<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        let forward = self
            .synonyms
            .iter()
            .filter(move |(key, _)| *key == needle)
            .flat_map(|(_, syns)| syns.iter().copied());

        let reverse = self
            .synonyms
            .iter()
            .filter(move |(_, syns)| syns.iter().any(|s| *s == needle))
            .map(|(key, _)| *key);

        forward.chain(reverse)
    }
}
