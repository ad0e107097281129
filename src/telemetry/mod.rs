//! Prediction telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a side-effect layer. Nothing in the answer pipeline reads it.
//!
//! # PRIVACY INVARIANT
//! Events never carry user content (questions, answers, profiles, URLs, e-mails).
//! Only enums, counts and durations are recorded.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::*;
pub use metrics::{compute_snapshot, TelemetrySnapshot};
pub use recorder::TelemetryRecorder;
