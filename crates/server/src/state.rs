//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. Building the state validates the configuration
//! and instantiates both outbound providers once; request handlers share them.

use crate::config::AppConfig;
use funr::{
    providers::{
        factory::{create_ai_provider, AiProviderSettings},
        metadata::apify::{ApifyProvider, ProxyConfiguration},
    },
    EnrichmentPipeline,
};
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The enrichment pipeline. It holds no per-request state.
    pub pipeline: Arc<EnrichmentPipeline>,
}

/// Builds the shared application state from the configuration.
///
/// Fails with the typed `ConfigError` if a credential is missing or a value is
/// out of range, so the server refuses to start rather than failing per request.
pub async fn build_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let inference = &config.inference;
    let ai_provider = create_ai_provider(&AiProviderSettings {
        provider: inference.provider.clone(),
        api_url: inference.api_url.clone(),
        api_key: inference.api_key.clone(),
        model_name: inference.model_name.clone(),
        max_tokens: inference.max_tokens,
        timeout: inference.timeout(),
    })?;

    let metadata = &config.metadata;
    let metadata_provider = ApifyProvider::new(
        metadata.api_url.clone(),
        metadata.api_token.clone().unwrap_or_default(),
        ProxyConfiguration {
            use_apify_proxy: metadata.use_proxy,
            apify_proxy_groups: metadata.proxy_groups.clone(),
        },
        metadata.timeout(),
    )?;
    info!(
        api_url = %metadata.api_url,
        timeout_secs = metadata.timeout_secs,
        "Initialized Apify metadata provider."
    );

    let pipeline = EnrichmentPipeline::builder()
        .ai_provider(ai_provider)
        .metadata_provider(Box::new(metadata_provider))
        .prompts(inference.system_prompt.clone(), inference.user_prompt.clone())
        .inference_timeout(inference.timeout())
        .build()?;

    Ok(AppState {
        pipeline: Arc::new(pipeline),
    })
}
