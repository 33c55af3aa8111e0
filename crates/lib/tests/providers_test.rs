//! # AI Provider Tests
//!
//! Exercises the OpenAI-compatible and Gemini providers against a mock HTTP
//! server, along with the provider factory.

use funr::errors::AiError;
use funr::providers::factory::{create_ai_provider, AiProviderSettings};
use funr::providers::ai::{gemini::GeminiProvider, openai::OpenAiProvider, AiProvider};
use serde_json::json;
use std::sync::Once;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

/// Initializes tracing for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

fn settings(provider: &str, api_url: Option<String>, api_key: Option<&str>) -> AiProviderSettings {
    AiProviderSettings {
        provider: provider.to_string(),
        api_url,
        api_key: api_key.map(String::from),
        model_name: "mock-chat-model".to_string(),
        max_tokens: 50,
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_openai_provider_sends_deterministic_request() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "mock-chat-model",
            "temperature": 0.0,
            "max_tokens": 50,
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "usr"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "  Taco Place\n"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(
        format!("{}/v1/chat/completions", server.uri()),
        Some("sk-test".to_string()),
        Some("mock-chat-model".to_string()),
        50,
        Duration::from_secs(5),
    )
    .unwrap();

    // --- 2. Act ---
    let result = provider.generate("sys", "usr").await;

    // --- 3. Assert ---
    assert_eq!(result.unwrap(), "  Taco Place\n");
}

#[tokio::test]
async fn test_openai_provider_surfaces_api_errors() {
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let provider = create_ai_provider(&settings("openai", Some(server.uri()), None)).unwrap();
    let result = provider.generate("sys", "usr").await;

    match result {
        Err(AiError::AiApi(body)) => assert_eq!(body, "rate limited"),
        other => panic!("Expected AiApi error, but got {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_provider_rejects_malformed_body() {
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = create_ai_provider(&settings("openai", Some(server.uri()), None)).unwrap();
    let result = provider.generate("sys", "usr").await;
    assert!(matches!(result, Err(AiError::AiDeserialization(_))));
}

#[tokio::test]
async fn test_gemini_provider_parses_first_candidate() {
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(query_param("key", "g-key"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "sys"}]},
            "contents": [{"parts": [{"text": "usr"}]}],
            "generationConfig": {"temperature": 0.0, "maxOutputTokens": 50}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Sushi Spot"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(
        format!("{}/models/gemini-test:generateContent", server.uri()),
        "g-key".to_string(),
        50,
        Duration::from_secs(5),
    )
    .unwrap();

    assert_eq!(provider.generate("sys", "usr").await.unwrap(), "Sushi Spot");
}

#[test]
fn test_factory_rejects_unknown_provider() {
    let result = create_ai_provider(&settings("claude-local", None, None));
    assert!(matches!(result, Err(AiError::UnsupportedProvider(name)) if name == "claude-local"));
}

#[test]
fn test_factory_requires_gemini_key() {
    let result = create_ai_provider(&settings("gemini", None, Some("")));
    assert!(matches!(result, Err(AiError::MissingApiKey(_))));
}
