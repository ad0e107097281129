use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::options::OptionResolution;
use super::types::{PredictionRequest, PredictionResponse};
use super::{
    AnswerPolicy, DEFAULT_CONFIDENCE, FORMAT_FALLBACK_CONFIDENCE, MAX_CONFIDENCE, MIN_CONFIDENCE,
    REPAIR_CONFIDENCE_FLOOR,
};
use crate::services::llm::{build_prompt, InferenceClient, InferenceError};

const REASON_CREDENTIALS_MISSING: &str = "credentials missing";
const REASON_FORMAT_FALLBACK: &str = "Fallback response due to formatting issue.";
const REASON_REPAIRED: &str = "Repaired answer to avoid placeholders.";
const REASON_DEFAULT: &str = "Answer chosen to maximize hiring chances.";

/// How the final answer came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionPath {
    /// Model answer used as-is.
    ModelAnswer,
    /// Model answer mapped onto the option list by a non-exact rule.
    OptionResolved(OptionResolution),
    /// Placeholder answer replaced by the repairer.
    PlaceholderRepaired,
    /// Model output was not valid JSON.
    FormattingFallback,
    CredentialsMissing,
    ServiceError,
}

impl PredictionPath {
    /// True for the two zero-confidence terminal states.
    pub fn is_failure(&self) -> bool {
        matches!(self, PredictionPath::CredentialsMissing | PredictionPath::ServiceError)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub response: PredictionResponse,
    pub path: PredictionPath,
}

/// Fields pulled out of the model's JSON, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAnswer {
    pub answer: String,
    pub confidence: Option<Value>,
    pub reasoning: String,
    pub intent: Option<String>,
}

/// One inference call per request, followed by deterministic clean-up.
pub struct Predictor {
    client: Arc<dyn InferenceClient>,
    policy: Arc<AnswerPolicy>,
    timeout: Duration,
}

impl Predictor {
    pub fn new(client: Arc<dyn InferenceClient>, policy: Arc<AnswerPolicy>, timeout: Duration) -> Self {
        Self { client, policy, timeout }
    }

    pub fn policy(&self) -> &AnswerPolicy {
        &self.policy
    }

    pub async fn predict(&self, request: &PredictionRequest) -> PredictionResponse {
        self.predict_detailed(request).await.response
    }

    pub async fn predict_detailed(&self, request: &PredictionRequest) -> Prediction {
        // 1. Credentials
        if !self.client.has_credentials() {
            warn!("inference credentials missing, skipping model call");
            return Prediction {
                response: PredictionResponse::empty(REASON_CREDENTIALS_MISSING),
                path: PredictionPath::CredentialsMissing,
            };
        }

        // 2. Inference
        match self.invoke(request).await {
            Ok(raw) => self.interpret(request, &raw),
            Err(e) => {
                warn!(model = %self.client.model_id(), "inference failed: {}", e);
                Prediction {
                    response: PredictionResponse::empty(format!("inference error: {}", e)),
                    path: PredictionPath::ServiceError,
                }
            }
        }
    }

    async fn invoke(&self, request: &PredictionRequest) -> Result<String, InferenceError> {
        let prompt = build_prompt(request);
        match tokio::time::timeout(self.timeout, self.client.complete(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(InferenceError::Timeout(self.timeout)),
        }
    }

    /// Steps 3 and 4: turn raw model text into a valid response. Pure.
    pub fn interpret(&self, request: &PredictionRequest, raw_text: &str) -> Prediction {
        let options = request.option_list();

        // 3. Parse, or fall back
        let Some(parsed) = parse_model_output(raw_text) else {
            let intent = self.policy.intents.normalize(None, &request.question);
            let answer = self.policy.repairer.repair(&request.question, options, intent);
            info!(%intent, "model output unparseable, using fallback answer");
            return Prediction {
                response: PredictionResponse {
                    answer,
                    confidence: FORMAT_FALLBACK_CONFIDENCE,
                    reasoning: Some(REASON_FORMAT_FALLBACK.to_string()),
                    intent,
                },
                path: PredictionPath::FormattingFallback,
            };
        };

        // 4a. Intent
        let intent = self
            .policy
            .intents
            .normalize(parsed.intent.as_deref(), &request.question);

        // 4b. Confidence
        let mut confidence = coerce_confidence(parsed.confidence.as_ref());

        let mut answer = parsed.answer;
        let mut reasoning = if parsed.reasoning.is_empty() {
            REASON_DEFAULT.to_string()
        } else {
            parsed.reasoning
        };
        let mut path = PredictionPath::ModelAnswer;

        // 4c. Placeholders
        if self.policy.detector.is_forbidden(&answer) {
            debug!(%intent, "placeholder answer from model, repairing");
            answer = self.policy.repairer.repair(&request.question, options, intent);
            confidence = confidence.max(REPAIR_CONFIDENCE_FLOOR);
            reasoning = REASON_REPAIRED.to_string();
            path = PredictionPath::PlaceholderRepaired;
        }

        // 4d. Option list
        if let Some(options) = options {
            if !options.contains(&answer) {
                let matched = self
                    .policy
                    .matcher
                    .resolve(&answer, options, intent, &request.question);
                confidence = matched.adjust(confidence);
                debug!(resolution = ?matched.resolution, "answer reconciled with options");
                answer = matched.answer;
                path = PredictionPath::OptionResolved(matched.resolution);
            }
        }

        // 4e. `Intent` cannot hold anything outside the allowed set.
        Prediction {
            response: PredictionResponse {
                answer,
                confidence,
                reasoning: Some(reasoning),
                intent,
            },
            path,
        }
    }
}

/// Strips code fences and parses the JSON object the model was asked for.
/// Anything that is not a JSON object counts as a formatting failure.
pub fn parse_model_output(raw: &str) -> Option<ModelAnswer> {
    let clean = raw.replace("```json", "").replace("```", "");
    let value: Value = serde_json::from_str(clean.trim()).ok()?;
    let obj = value.as_object()?;

    let answer = match obj.get("answer") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    };

    let reasoning = obj
        .get("reasoning")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    Some(ModelAnswer {
        answer,
        confidence: obj.get("confidence").cloned(),
        reasoning,
        intent: obj.get("intent").and_then(Value::as_str).map(str::to_string),
    })
}

/// Numbers and numeric strings are accepted; anything else defaults.
/// The result is always clamped to [0.70, 0.99].
pub fn coerce_confidence(raw: Option<&Value>) -> f64 {
    let value = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|c| c.is_finite())
    .unwrap_or(DEFAULT_CONFIDENCE);

    value.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}
