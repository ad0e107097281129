use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::InferenceConfig;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected response envelope: {0}")]
    Envelope(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// A hosted text-completion model.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send one prompt, return the raw text the model produced.
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError>;

    /// Whether credentials are configured at all.
    fn has_credentials(&self) -> bool;

    fn model_id(&self) -> &str;
}

#[derive(Serialize)]
struct InvokeRequest<'a> {
    #[serde(rename = "inferenceConfig")]
    inference_config: InvokeConfig,
    messages: Vec<InvokeMessage<'a>>,
}

#[derive(Serialize)]
struct InvokeConfig {
    max_new_tokens: u32,
}

#[derive(Serialize)]
struct InvokeMessage<'a> {
    role: &'static str,
    content: Vec<TextBlock<'a>>,
}

#[derive(Serialize)]
struct TextBlock<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct InvokeResponse {
    output: InvokeOutput,
}

#[derive(Deserialize)]
struct InvokeOutput {
    message: OutputMessage,
}

#[derive(Deserialize)]
struct OutputMessage {
    #[serde(default)]
    content: Vec<OutputBlock>,
}

#[derive(Deserialize)]
struct OutputBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Bedrock `invoke` endpoint authenticated with a bearer API key.
#[derive(Clone)]
pub struct BedrockClient {
    client: Client,
    endpoint: String,
    model_id: String,
    api_key: Option<String>,
    max_new_tokens: u32,
}

impl BedrockClient {
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.timeout) // network-level bound
                .build()
                .unwrap_or_default(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model_id: config.model_id.clone(),
            api_key: config.api_key.clone(),
            max_new_tokens: config.max_new_tokens,
        }
    }

    fn invoke_url(&self) -> String {
        format!("{}/model/{}/invoke", self.endpoint, self.model_id)
    }
}

#[async_trait]
impl InferenceClient for BedrockClient {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        let body = InvokeRequest {
            inference_config: InvokeConfig {
                max_new_tokens: self.max_new_tokens,
            },
            messages: vec![InvokeMessage {
                role: "user",
                content: vec![TextBlock { text: prompt }],
            }],
        };

        let mut request = self
            .client
            .post(self.invoke_url())
            .header("accept", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(InferenceError::Status { status, body: text });
        }

        debug!(model = %self.model_id, bytes = text.len(), "inference response received");
        extract_text(&text)
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Pulls `output.message.content[0].text` out of an invoke response body.
pub fn extract_text(body: &str) -> Result<String, InferenceError> {
    let parsed: InvokeResponse =
        serde_json::from_str(body).map_err(|e| InferenceError::Envelope(e.to_string()))?;

    parsed
        .output
        .message
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or_else(|| InferenceError::Envelope("no text block in model output".to_string()))
}
