use std::collections::VecDeque;
use serde::Serialize;

use super::event::{OutcomeKind, PatternEventKind, TelemetryEvent};

#[derive(Debug, Clone, Default, Serialize)]
pub struct TelemetrySnapshot {
    pub prediction_stats: PredictionStats,
    pub memory_stats: MemoryStats,
    pub extension_stats: ExtensionStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PredictionStats {
    pub total: u64,
    pub pattern_hits: u64,
    pub model_answers: u64,
    pub option_resolved: u64,
    pub repaired: u64,
    pub format_fallbacks: u64,
    pub credentials_missing: u64,
    pub service_errors: u64,
    pub total_latency_ms: u64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryStats {
    pub hits: u64,
    pub misses: u64,
    pub learned: u64,
    pub persist_failures: u64,
    pub lookup_failures: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtensionStats {
    pub runs: u64,
    pub total_questions: u64,
    pub ai_calls: u64,
    pub learned_patterns_used: u64,
    pub filled_success: u64,
    pub filled_failed: u64,
    pub missed: u64,
    pub avg_process_ms: f64,
    /// Successful fills over attempted fills.
    pub fill_rate: f64,
}

impl PredictionStats {
    /// Share of predictions that ended without a usable answer.
    pub fn failure_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.credentials_missing + self.service_errors) as f64 / self.total as f64
    }
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut process_ms_total = 0u64;

    for event in events {
        match event {
            TelemetryEvent::Prediction { outcome, latency_ms, .. } => {
                let stats = &mut snap.prediction_stats;
                stats.total += 1;
                stats.total_latency_ms += latency_ms;
                stats.max_latency_ms = stats.max_latency_ms.max(*latency_ms);
                match outcome {
                    OutcomeKind::PatternHit => stats.pattern_hits += 1,
                    OutcomeKind::ModelAnswer => stats.model_answers += 1,
                    OutcomeKind::OptionResolved => stats.option_resolved += 1,
                    OutcomeKind::PlaceholderRepaired => stats.repaired += 1,
                    OutcomeKind::FormattingFallback => stats.format_fallbacks += 1,
                    OutcomeKind::CredentialsMissing => stats.credentials_missing += 1,
                    OutcomeKind::ServiceError => stats.service_errors += 1,
                }
            }
            TelemetryEvent::PatternMemory { kind } => match kind {
                PatternEventKind::Hit => snap.memory_stats.hits += 1,
                PatternEventKind::Miss => snap.memory_stats.misses += 1,
                PatternEventKind::Learned => snap.memory_stats.learned += 1,
                PatternEventKind::PersistFailed => snap.memory_stats.persist_failures += 1,
                PatternEventKind::LookupFailed => snap.memory_stats.lookup_failures += 1,
            },
            TelemetryEvent::ExtensionRun(run) => {
                let stats = &mut snap.extension_stats;
                stats.runs += 1;
                stats.total_questions += u64::from(run.total_questions);
                stats.ai_calls += u64::from(run.ai_calls);
                stats.learned_patterns_used += u64::from(run.learned_patterns_used);
                stats.filled_success += u64::from(run.filled_success);
                stats.filled_failed += u64::from(run.filled_failed);
                stats.missed += u64::from(run.missed);
                process_ms_total += run.total_process_ms;
            }
        }
    }

    // Averages
    if snap.prediction_stats.total > 0 {
        snap.prediction_stats.avg_latency_ms =
            snap.prediction_stats.total_latency_ms as f64 / snap.prediction_stats.total as f64;
    }

    if snap.extension_stats.runs > 0 {
        snap.extension_stats.avg_process_ms = process_ms_total as f64 / snap.extension_stats.runs as f64;
    }

    let attempted = snap.extension_stats.filled_success + snap.extension_stats.filled_failed;
    if attempted > 0 {
        snap.extension_stats.fill_rate = snap.extension_stats.filled_success as f64 / attempted as f64;
    }

    snap
}
