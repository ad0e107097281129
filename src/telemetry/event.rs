use serde::{Deserialize, Serialize};

use crate::answer::{Intent, PredictionPath};

// Allowed: enums, counts, durations
// Forbidden: question text, answers, profile data, URLs, e-mails

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    Prediction {
        outcome: OutcomeKind,
        intent: Intent,
        latency_ms: u64,
    },

    PatternMemory {
        kind: PatternEventKind,
    },

    ExtensionRun(ExtensionRunSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    PatternHit,
    ModelAnswer,
    OptionResolved,
    PlaceholderRepaired,
    FormattingFallback,
    CredentialsMissing,
    ServiceError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternEventKind {
    Hit,
    Miss,
    Learned,
    PersistFailed,
    LookupFailed,
}

impl From<PredictionPath> for OutcomeKind {
    fn from(path: PredictionPath) -> Self {
        match path {
            PredictionPath::ModelAnswer => OutcomeKind::ModelAnswer,
            PredictionPath::OptionResolved(_) => OutcomeKind::OptionResolved,
            PredictionPath::PlaceholderRepaired => OutcomeKind::PlaceholderRepaired,
            PredictionPath::FormattingFallback => OutcomeKind::FormattingFallback,
            PredictionPath::CredentialsMissing => OutcomeKind::CredentialsMissing,
            PredictionPath::ServiceError => OutcomeKind::ServiceError,
        }
    }
}

/// Per-page usage report sent by the extension after a fill pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionRunReport {
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub url: String,
    pub scan_duration_ms: u64,
    pub total_questions: u32,
    pub mapping_duration_ms: u64,
    pub mapped_by_rules: u32,
    pub ai_questions_count: u32,
    pub ai_calls_count: u32,
    pub learned_patterns_used: u32,
    pub filling_duration_ms: u64,
    pub filled_success_count: u32,
    pub filled_failed_count: u32,
    #[serde(default)]
    pub missed_questions: Vec<String>,
    #[serde(default)]
    pub all_questions: Vec<String>,
    pub total_process_time_ms: u64,
}

/// The content-free part of an [`ExtensionRunReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRunSummary {
    pub total_questions: u32,
    pub mapped_by_rules: u32,
    pub ai_calls: u32,
    pub learned_patterns_used: u32,
    pub filled_success: u32,
    pub filled_failed: u32,
    pub missed: u32,
    pub total_process_ms: u64,
}

impl From<&ExtensionRunReport> for ExtensionRunSummary {
    fn from(report: &ExtensionRunReport) -> Self {
        Self {
            total_questions: report.total_questions,
            mapped_by_rules: report.mapped_by_rules,
            ai_calls: report.ai_calls_count,
            learned_patterns_used: report.learned_patterns_used,
            filled_success: report.filled_success_count,
            filled_failed: report.filled_failed_count,
            missed: report.missed_questions.len() as u32, // count only, text dropped
            total_process_ms: report.total_process_time_ms,
        }
    }
}
