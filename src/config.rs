use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::answer::MIN_CONFIDENCE;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_MODEL_ID: &str = "us.amazon.nova-lite-v1:0";
const DEFAULT_MAX_NEW_TOKENS: u32 = 450;
const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_PATTERN_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the hosted model.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    pub region: String,
    pub endpoint: String,
    pub model_id: String,
    /// Bearer token. `None` means every prediction ends in CredentialsMissing.
    pub api_key: Option<String>,
    pub max_new_tokens: u32,
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: regional_endpoint(DEFAULT_REGION),
            model_id: DEFAULT_MODEL_ID.to_string(),
            api_key: None,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub inference: InferenceConfig,
    /// Confidence reported for answers served from pattern memory.
    pub pattern_memory_confidence: f64,
    /// JSON file backing the pattern store; in-memory when absent.
    pub pattern_store_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            inference: InferenceConfig::default(),
            pattern_memory_confidence: DEFAULT_PATTERN_CONFIDENCE,
            pattern_store_path: None,
        }
    }
}

impl ServiceConfig {
    /// Reads the process environment (after loading `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let region = get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let endpoint = get("AUTOFILL_INFERENCE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| regional_endpoint(&region));

        let max_new_tokens = match get("AUTOFILL_MAX_NEW_TOKENS") {
            Some(v) => parse_number::<u32>("AUTOFILL_MAX_NEW_TOKENS", &v)?,
            None => DEFAULT_MAX_NEW_TOKENS,
        };

        let timeout_ms = match get("AUTOFILL_INFERENCE_TIMEOUT_MS") {
            Some(v) => parse_number::<u64>("AUTOFILL_INFERENCE_TIMEOUT_MS", &v)?,
            None => DEFAULT_TIMEOUT_MS,
        };

        let pattern_memory_confidence = match get("AUTOFILL_PATTERN_CONFIDENCE") {
            Some(v) => {
                let c = parse_number::<f64>("AUTOFILL_PATTERN_CONFIDENCE", &v)?;
                // Memory hits are usable answers, so they carry the usable floor.
                if !(MIN_CONFIDENCE..=1.0).contains(&c) {
                    return Err(ConfigError::Invalid {
                        key: "AUTOFILL_PATTERN_CONFIDENCE",
                        value: v,
                        reason: format!("must be within [{}, 1]", MIN_CONFIDENCE),
                    });
                }
                c
            }
            None => DEFAULT_PATTERN_CONFIDENCE,
        };

        Ok(Self {
            inference: InferenceConfig {
                region,
                endpoint,
                model_id: get("AUTOFILL_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
                api_key: get("AWS_BEARER_TOKEN_BEDROCK"),
                max_new_tokens,
                timeout: Duration::from_millis(timeout_ms),
            },
            pattern_memory_confidence,
            pattern_store_path: get("AUTOFILL_PATTERN_STORE").map(PathBuf::from),
        })
    }
}

fn regional_endpoint(region: &str) -> String {
    format!("https://bedrock-runtime.{}.amazonaws.com", region)
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
