use thiserror::Error;

/// Errors raised by an AI provider while generating a completion.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider did not answer within {0} seconds")]
    Timeout(u64),
    #[error("API key is missing for AI provider '{0}'")]
    MissingApiKey(String),
    #[error("Unsupported AI provider '{0}'")]
    UnsupportedProvider(String),
}

/// Errors raised while resolving a post URL into `PostMetadata`.
///
/// Every variant is an expected outcome: the pipeline logs it and degrades
/// to a result that asks the sender for the restaurant name.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Metadata provider request timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("Failed to send request to metadata provider: {0}")]
    Request(reqwest::Error),
    #[error("Metadata provider returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse metadata provider response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Metadata provider returned no results for {0}")]
    EmptyResult(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err)
        } else if err.is_decode() {
            FetchError::Deserialization(err)
        } else {
            FetchError::Request(err)
        }
    }
}

/// Errors raised while assembling an `EnrichmentPipeline`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("AI provider is missing")]
    MissingAiProvider,
    #[error("Metadata provider is missing")]
    MissingMetadataProvider,
}
