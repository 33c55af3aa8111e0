//! # Enrichment Pipeline
//!
//! Sequences normalization, link extraction, metadata retrieval and name
//! inference for one inbound message. Stages run strictly in order and share
//! no state between requests.
//!
//! A missing link ends the pipeline. A failed metadata fetch does not: the
//! result is still a success, flagged so the sender can reply with the name.

use crate::{
    errors::PipelineError,
    inference::NameInferencer,
    link::extract_instagram_url,
    payload::{normalize, RawPayload},
    providers::{ai::AiProvider, metadata::MetadataProvider},
    types::{
        EnrichmentOutcome, EnrichmentResult, InboundMessage, MANUAL_INPUT_MESSAGE,
        SUCCESS_MESSAGE, UNKNOWN_RESTAURANT,
    },
};
use std::time::Duration;
use tracing::{info, warn};

/// Runs inbound messages through the extraction and enrichment stages.
#[derive(Debug, Clone)]
pub struct EnrichmentPipeline {
    metadata_provider: Box<dyn MetadataProvider>,
    name_inferencer: NameInferencer,
}

impl EnrichmentPipeline {
    pub fn builder() -> EnrichmentPipelineBuilder {
        EnrichmentPipelineBuilder::new()
    }

    /// Normalizes a raw request and processes the resulting message.
    pub async fn process_raw(&self, raw: &RawPayload<'_>) -> EnrichmentOutcome {
        let message = normalize(raw);
        self.process(&message).await
    }

    /// Processes one normalized message.
    pub async fn process(&self, message: &InboundMessage) -> EnrichmentOutcome {
        let text_message = message.body();
        info!("Received message: {:?}", text_message);

        let Some(instagram_url) = extract_instagram_url(text_message) else {
            info!("No Instagram link found in message");
            return EnrichmentOutcome::NoLinkFound;
        };
        info!(url = %instagram_url, "Extracted Instagram URL");

        let result = match self.metadata_provider.fetch(&instagram_url).await {
            Ok(metadata) => {
                info!(
                    url = %instagram_url,
                    tagged = metadata.tagged_accounts.len(),
                    location = ?metadata.location_name,
                    "Fetched post metadata"
                );
                let restaurant_name = self.name_inferencer.infer_from_metadata(&metadata).await;
                EnrichmentResult {
                    instagram_url,
                    text_message: text_message.to_string(),
                    metadata: Some(metadata),
                    restaurant_name,
                    needs_manual_caption: false,
                    message: SUCCESS_MESSAGE.to_string(),
                }
            }
            Err(e) => {
                warn!(url = %instagram_url, "Metadata fetch failed, asking sender for the name: {e}");
                EnrichmentResult {
                    instagram_url,
                    text_message: text_message.to_string(),
                    metadata: None,
                    restaurant_name: UNKNOWN_RESTAURANT.to_string(),
                    needs_manual_caption: true,
                    message: MANUAL_INPUT_MESSAGE.to_string(),
                }
            }
        };

        EnrichmentOutcome::Enriched(result)
    }
}

/// A builder for creating `EnrichmentPipeline` instances.
#[derive(Default)]
pub struct EnrichmentPipelineBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    metadata_provider: Option<Box<dyn MetadataProvider>>,
    prompts: Option<(String, String)>,
    inference_timeout: Option<Duration>,
}

impl EnrichmentPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider used to name restaurants.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Sets the provider that resolves post URLs into metadata.
    pub fn metadata_provider(mut self, provider: Box<dyn MetadataProvider>) -> Self {
        self.metadata_provider = Some(provider);
        self
    }

    /// Overrides the system and user prompt templates for name inference.
    pub fn prompts(mut self, system_prompt: String, user_prompt: String) -> Self {
        self.prompts = Some((system_prompt, user_prompt));
        self
    }

    /// Bounds each inference call.
    pub fn inference_timeout(mut self, timeout: Duration) -> Self {
        self.inference_timeout = Some(timeout);
        self
    }

    /// Builds the `EnrichmentPipeline`.
    ///
    /// Fails if either provider has not been set.
    pub fn build(self) -> Result<EnrichmentPipeline, PipelineError> {
        let ai_provider = self.ai_provider.ok_or(PipelineError::MissingAiProvider)?;
        let metadata_provider = self
            .metadata_provider
            .ok_or(PipelineError::MissingMetadataProvider)?;

        let mut name_inferencer = NameInferencer::new(ai_provider);
        if let Some((system_prompt, user_prompt)) = self.prompts {
            name_inferencer = name_inferencer.with_prompts(system_prompt, user_prompt);
        }
        if let Some(timeout) = self.inference_timeout {
            name_inferencer = name_inferencer.with_timeout(timeout);
        }

        Ok(EnrichmentPipeline {
            metadata_provider,
            name_inferencer,
        })
    }
}
