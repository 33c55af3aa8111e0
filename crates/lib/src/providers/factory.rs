//! # AI Provider Factory
//!
//! Centralizes the creation of AI provider instances from plain settings, so
//! that any consumer (the server, tests, scripts) builds providers the same way.

use crate::{
    errors::AiError,
    providers::ai::{
        gemini::{gemini_api_url, GeminiProvider},
        openai::{OpenAiProvider, DEFAULT_OPENAI_API_URL},
        AiProvider,
    },
};
use std::time::Duration;
use tracing::info;

/// Everything needed to instantiate an AI provider.
#[derive(Debug, Clone)]
pub struct AiProviderSettings {
    /// The type of provider: `openai` (or any compatible server) or `gemini`.
    pub provider: String,
    /// The API URL. Derived from the provider type when absent.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model_name: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// Creates an AI provider from its settings.
pub fn create_ai_provider(settings: &AiProviderSettings) -> Result<Box<dyn AiProvider>, AiError> {
    let api_key = settings.api_key.clone().filter(|key| !key.is_empty());
    let provider: Box<dyn AiProvider> = match settings.provider.as_str() {
        "openai" => {
            let api_url = settings
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string());
            info!(%api_url, model = %settings.model_name, "Configuring OpenAI-compatible provider");
            Box::new(OpenAiProvider::new(
                api_url,
                api_key,
                Some(settings.model_name.clone()),
                settings.max_tokens,
                settings.timeout,
            )?)
        }
        "gemini" => {
            let api_key = api_key.ok_or_else(|| AiError::MissingApiKey("gemini".to_string()))?;
            let api_url = settings
                .api_url
                .clone()
                .unwrap_or_else(|| gemini_api_url(&settings.model_name));
            info!(%api_url, "Configuring Gemini provider");
            Box::new(GeminiProvider::new(
                api_url,
                api_key,
                settings.max_tokens,
                settings.timeout,
            )?)
        }
        other => return Err(AiError::UnsupportedProvider(other.to_string())),
    };
    Ok(provider)
}
