use async_trait::async_trait;
use funr::errors::{AiError, FetchError};
use funr::providers::{ai::AiProvider, metadata::MetadataProvider};
use funr::types::PostMetadata;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Mock AI Provider ---

#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    response: Option<String>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    /// A provider with no programmed answer; every call fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that answers every prompt with `response`.
    pub fn answering(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            ..Self::default()
        }
    }

    /// Sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AiError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.response.clone().ok_or_else(|| {
            AiError::AiApi(format!(
                "MockAiProvider: No response programmed for user prompt. Got: '{user_prompt}'"
            ))
        })
    }
}

// --- Mock Metadata Provider ---

/// A metadata provider that returns a fixed result and records requested URLs.
#[derive(Clone, Debug)]
pub struct MockMetadataProvider {
    metadata: Option<PostMetadata>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockMetadataProvider {
    /// Every fetch succeeds with `metadata`.
    pub fn returning(metadata: PostMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every fetch fails as if the provider had no results.
    pub fn failing() -> Self {
        Self {
            metadata: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataProvider for MockMetadataProvider {
    async fn fetch(&self, url: &str) -> Result<PostMetadata, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.metadata
            .clone()
            .ok_or_else(|| FetchError::EmptyResult(url.to_string()))
    }
}

// --- Test Data Helpers ---

/// Metadata for the taco post used throughout the tests.
pub fn taco_post_metadata() -> PostMetadata {
    PostMetadata {
        caption: "Best tacos in town @chefmike".to_string(),
        tagged_accounts: vec!["chefmike".to_string()],
        location_name: Some("Taco Place".to_string()),
    }
}
