pub mod gemini;
pub mod openai;

use crate::errors::AiError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI completion provider.
///
/// Implementations send one system prompt and one user prompt and return the
/// raw text of the first completion. Sampling parameters (temperature, output
/// ceiling, timeout) are fixed when the provider is built.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AiError>;
}

dyn_clone::clone_trait_object!(AiProvider);
