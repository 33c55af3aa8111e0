//! # Restaurant Name Inference
//!
//! Asks an AI provider to name the restaurant featured in a post. Every failure
//! path degrades to [`UNKNOWN_RESTAURANT`]; callers never see an error.

use crate::{
    errors::AiError,
    prompts::tasks::{RESTAURANT_NAME_SYSTEM_PROMPT, RESTAURANT_NAME_USER_PROMPT},
    providers::ai::AiProvider,
    types::{PostMetadata, UNKNOWN_RESTAURANT},
};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Stands in for an empty tag list or a missing location.
const NONE_PLACEHOLDER: &str = "None";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(caption|tagged_users|location)\}").expect("placeholder pattern is valid")
});

/// Fills the user prompt template in a single pass, so text inside the caption
/// that looks like a placeholder is left alone.
pub fn render_user_prompt(
    template: &str,
    caption: &str,
    tagged_accounts: &[String],
    location: Option<&str>,
) -> String {
    let tagged = if tagged_accounts.is_empty() {
        NONE_PLACEHOLDER.to_string()
    } else {
        tagged_accounts.join(", ")
    };
    let location = location.unwrap_or(NONE_PLACEHOLDER);

    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "caption" => caption.to_string(),
            "tagged_users" => tagged.clone(),
            _ => location.to_string(),
        })
        .into_owned()
}

/// Names restaurants from post metadata with a bounded AI call.
#[derive(Debug, Clone)]
pub struct NameInferencer {
    ai_provider: Box<dyn AiProvider>,
    system_prompt: String,
    user_prompt: String,
    timeout: Duration,
}

impl NameInferencer {
    pub fn new(ai_provider: Box<dyn AiProvider>) -> Self {
        Self {
            ai_provider,
            system_prompt: RESTAURANT_NAME_SYSTEM_PROMPT.to_string(),
            user_prompt: RESTAURANT_NAME_USER_PROMPT.to_string(),
            timeout: DEFAULT_INFERENCE_TIMEOUT,
        }
    }

    pub fn with_prompts(mut self, system_prompt: String, user_prompt: String) -> Self {
        self.system_prompt = system_prompt;
        self.user_prompt = user_prompt;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the AI call and returns the trimmed completion, or the error that
    /// prevented one.
    pub async fn try_infer(
        &self,
        caption: &str,
        tagged_accounts: &[String],
        location: Option<&str>,
    ) -> Result<String, AiError> {
        let user_prompt = render_user_prompt(&self.user_prompt, caption, tagged_accounts, location);
        debug!(system_prompt = %self.system_prompt, user_prompt = %user_prompt, "--> Sending prompts to AI Provider");

        let raw_response = tokio::time::timeout(
            self.timeout,
            self.ai_provider.generate(&self.system_prompt, &user_prompt),
        )
        .await
        .map_err(|_| AiError::Timeout(self.timeout.as_secs()))??;

        debug!("<-- Restaurant name from AI: {}", &raw_response);
        Ok(raw_response.trim().to_string())
    }

    /// Returns the restaurant name, or `"Unknown"` when the provider fails,
    /// times out, or answers with nothing.
    pub async fn infer(
        &self,
        caption: &str,
        tagged_accounts: &[String],
        location: Option<&str>,
    ) -> String {
        match self.try_infer(caption, tagged_accounts, location).await {
            Ok(name) if !name.is_empty() => {
                info!(restaurant_name = %name, "Inferred restaurant name");
                name
            }
            Ok(_) => {
                warn!("AI provider returned an empty restaurant name");
                UNKNOWN_RESTAURANT.to_string()
            }
            Err(e) => {
                warn!("Restaurant name inference failed: {e}");
                UNKNOWN_RESTAURANT.to_string()
            }
        }
    }

    pub async fn infer_from_metadata(&self, metadata: &PostMetadata) -> String {
        self.infer(
            &metadata.caption,
            &metadata.tagged_accounts,
            metadata.location_name.as_deref(),
        )
        .await
    }
}
