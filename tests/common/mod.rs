#![allow(dead_code)]

use async_trait::async_trait;
use autofill_answers::answer::{AnswerPolicy, Predictor};
use autofill_answers::services::llm::{InferenceClient, InferenceError};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Test double that replays one canned reply.
pub struct ScriptedInference {
    reply: Result<String, StatusCode>,
    credentials: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedInference {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            credentials: true,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: StatusCode) -> Self {
        Self {
            reply: Err(status),
            credentials: true,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn without_credentials() -> Self {
        Self {
            credentials: false,
            ..Self::replying("{}")
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceClient for ScriptedInference {
    async fn complete(&self, _prompt: &str) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(InferenceError::Status {
                status: *status,
                body: "upstream unavailable".to_string(),
            }),
        }
    }

    fn has_credentials(&self) -> bool {
        self.credentials
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

pub fn predictor_with(client: Arc<ScriptedInference>) -> Predictor {
    Predictor::new(client, Arc::new(AnswerPolicy::new()), Duration::from_secs(2))
}

/// JSON the model is asked to produce.
pub fn model_json(answer: &str, confidence: f64, intent: Option<&str>) -> String {
    serde_json::json!({
        "answer": answer,
        "confidence": confidence,
        "reasoning": "from profile",
        "intent": intent,
    })
    .to_string()
}
