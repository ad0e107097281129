use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::answer::{Intent, PredictionRequest, PredictionResponse};

/// Where a pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternSource {
    #[serde(rename = "AI")]
    Ai,
    #[serde(rename = "manual")]
    Manual,
}

impl Default for PatternSource {
    fn default() -> Self {
        PatternSource::Ai
    }
}

/// One accepted answer and the spellings that mean the same thing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerMapping {
    pub canonical_value: String,
    #[serde(default)]
    pub variants: Vec<String>,
    /// Option list the answer was chosen from, if any.
    #[serde(default)]
    pub context_options: Vec<String>,
}

impl AnswerMapping {
    /// First variant, falling back to the canonical value.
    pub fn preferred(&self) -> &str {
        self.variants
            .first()
            .map(String::as_str)
            .unwrap_or(&self.canonical_value)
    }
}

/// A learned question -> answer mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedPattern {
    pub question_pattern: String,
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_key: Option<String>,
    pub field_type: String,
    pub confidence: f64,
    #[serde(default)]
    pub source: PatternSource,
    #[serde(default)]
    pub answer_mappings: Vec<AnswerMapping>,
    #[serde(default = "default_usage")]
    pub usage_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
}

fn default_usage() -> u32 {
    1
}

impl LearnedPattern {
    /// Pattern recorded after the model produced a usable answer.
    pub fn from_prediction(request: &PredictionRequest, response: &PredictionResponse) -> Self {
        let now = Utc::now();
        Self {
            question_pattern: request.question.trim().to_lowercase(),
            intent: response.intent,
            canonical_key: None,
            field_type: request.field_type.clone(),
            confidence: response.confidence,
            source: PatternSource::Ai,
            answer_mappings: vec![AnswerMapping {
                canonical_value: response.answer.clone(),
                variants: vec![response.answer.clone()],
                context_options: request.options.clone().unwrap_or_default(),
            }],
            usage_count: 1,
            created_at: Some(now),
            last_used: Some(now),
        }
    }

    /// Answer served on a memory hit, if the pattern carries a non-empty one.
    pub fn recalled_answer(&self) -> Option<&str> {
        self.answer_mappings
            .first()
            .map(AnswerMapping::preferred)
            .filter(|a| !a.is_empty())
    }

    /// Most recent activity, used by sync filters.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_used.or(self.created_at)
    }
}

/// A pattern as persisted by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPattern {
    pub id: Uuid,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(flatten)]
    pub pattern: LearnedPattern,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternStats {
    pub total_patterns: usize,
    pub total_usage: u64,
    pub owners: usize,
    pub ai_learned: usize,
    pub manual: usize,
    pub by_intent: BTreeMap<Intent, usize>,
}

/// Lookup key for a question: lowercase, trimmed, single-spaced.
pub fn question_key(question: &str) -> String {
    question
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
