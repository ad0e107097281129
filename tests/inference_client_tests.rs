use autofill_answers::answer::{Intent, PredictionRequest};
use autofill_answers::config::InferenceConfig;
use autofill_answers::services::llm::client::extract_text;
use autofill_answers::services::llm::{build_prompt, BedrockClient, InferenceClient, InferenceError};
use serde_json::json;

#[test]
fn test_extract_text_reads_first_block() {
    let body = json!({
        "output": {"message": {"role": "assistant", "content": [{"text": "{\"answer\": \"Yes\"}"}, {"text": "ignored"}]}},
        "stopReason": "end_turn",
        "usage": {"inputTokens": 10, "outputTokens": 5}
    })
    .to_string();

    assert_eq!(extract_text(&body).unwrap(), "{\"answer\": \"Yes\"}");
}

#[test]
fn test_extract_text_rejects_bad_envelopes() {
    let cases = [
        "not json".to_string(),
        json!({"output": {}}).to_string(),
        json!({"output": {"message": {"content": []}}}).to_string(),
        json!({"output": {"message": {"content": [{"image": "..."}]}}}).to_string(),
    ];

    for body in &cases {
        assert!(
            matches!(extract_text(body), Err(InferenceError::Envelope(_))),
            "{} should be rejected",
            body
        );
    }
}

#[test]
fn test_client_credentials_follow_config() {
    let config = InferenceConfig::default();
    let client = BedrockClient::new(&config);
    assert!(!client.has_credentials());
    assert_eq!(client.model_id(), "us.amazon.nova-lite-v1:0");

    let config = InferenceConfig {
        api_key: Some("token".to_string()),
        model_id: "other-model".to_string(),
        ..InferenceConfig::default()
    };
    let client = BedrockClient::new(&config);
    assert!(client.has_credentials());
    assert_eq!(client.model_id(), "other-model");
}

#[test]
fn test_prompt_lists_options_verbatim() {
    let mut profile = serde_json::Map::new();
    profile.insert("firstName".to_string(), json!("Jane"));

    let request = PredictionRequest::new("Are you authorized to work in the US?", "radio")
        .with_options(["Yes", "No"])
        .with_profile(profile);
    let prompt = build_prompt(&request);

    assert!(prompt.contains("Are you authorized to work in the US?"));
    assert!(prompt.contains("AVAILABLE OPTIONS (CHOOSE EXACTLY ONE, COPY EXACTLY):\n- Yes\n- No"));
    assert!(prompt.contains("\"firstName\": \"Jane\""));
    assert!(!prompt.contains("This question requires a written response."));
}

#[test]
fn test_prompt_for_free_text_lists_every_intent() {
    let request = PredictionRequest::new("Why do you want this job?", "textarea").with_options(Vec::<String>::new());
    let prompt = build_prompt(&request);

    assert!(prompt.contains("This question requires a written response."));
    assert!(!prompt.contains("AVAILABLE OPTIONS"));
    for intent in Intent::ALL {
        assert!(prompt.contains(&format!("- {}", intent.as_str())), "missing {}", intent);
    }
    assert!(prompt.contains("RESPONSE FORMAT (JSON ONLY, NO EXTRA TEXT):"));
}
