//! Answer pipeline: intent normalization, placeholder detection, repair and
//! option reconciliation, orchestrated by the [`Predictor`].
//!
//! # INVARIANT
//! Every answer leaving this module is either empty with confidence 0.0
//! (credentials missing / service error) or non-empty with confidence >= 0.70.

pub mod types;
pub mod intent;
pub mod forbidden;
pub mod repair;
pub mod options;
pub mod predictor;

pub use types::*;
pub use intent::IntentNormalizer;
pub use forbidden::ForbiddenAnswerDetector;
pub use repair::AnswerRepairer;
pub use options::{OptionMatcher, OptionMatch, OptionResolution};
pub use predictor::{Predictor, Prediction, PredictionPath};

/// Lowest confidence a usable answer may carry.
pub const MIN_CONFIDENCE: f64 = 0.70;
/// Highest confidence the model is allowed to claim.
pub const MAX_CONFIDENCE: f64 = 0.99;
/// Floor applied whenever an answer had to be repaired.
pub const REPAIR_CONFIDENCE_FLOOR: f64 = 0.75;
/// Used when the model omits or garbles its confidence.
pub const DEFAULT_CONFIDENCE: f64 = 0.75;
/// Fixed confidence for the formatting fallback.
pub const FORMAT_FALLBACK_CONFIDENCE: f64 = 0.78;

/// The read-only tables the pipeline runs against.
/// Built once at start-up and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct AnswerPolicy {
    pub intents: IntentNormalizer,
    pub detector: ForbiddenAnswerDetector,
    pub repairer: AnswerRepairer,
    pub matcher: OptionMatcher,
}

impl AnswerPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}
