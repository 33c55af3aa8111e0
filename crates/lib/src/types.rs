use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The sentinel restaurant name used whenever inference is unavailable.
pub const UNKNOWN_RESTAURANT: &str = "Unknown";

/// The inbound field holding the free text of an SMS.
pub const BODY_FIELD: &str = "Body";

pub const SUCCESS_MESSAGE: &str = "Instagram data processed successfully!";
pub const MANUAL_INPUT_MESSAGE: &str = "We couldn't read that post. Reply with the restaurant name and we'll save it for you.";
pub const NO_LINK_MESSAGE: &str = "No Instagram link found in message.";

/// A normalized inbound message: field name to string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessage {
    fields: HashMap<String, String>,
}

impl InboundMessage {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The message text. A missing `Body` field reads as an empty string.
    pub fn body(&self) -> &str {
        self.get(BODY_FIELD).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<HashMap<String, String>> for InboundMessage {
    fn from(fields: HashMap<String, String>) -> Self {
        Self::new(fields)
    }
}

/// Caption, tagged accounts and location of a resolved post.
///
/// Only produced by a successful fetch. A post without a caption still yields
/// a `PostMetadata` with an empty `caption`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub caption: String,
    pub tagged_accounts: Vec<String>,
    pub location_name: Option<String>,
}

/// The result of running a message with a link through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentResult {
    pub instagram_url: String,
    pub text_message: String,
    pub metadata: Option<PostMetadata>,
    pub restaurant_name: String,
    pub needs_manual_caption: bool,
    pub message: String,
}

/// What the pipeline produced for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// The message carried no supported link; nothing else ran.
    NoLinkFound,
    Enriched(EnrichmentResult),
}

impl EnrichmentOutcome {
    pub fn to_response(&self) -> EnrichmentResponse {
        match self {
            EnrichmentOutcome::NoLinkFound => EnrichmentResponse::error(NO_LINK_MESSAGE),
            EnrichmentOutcome::Enriched(result) => EnrichmentResponse::from(result),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// The externally visible response record.
///
/// Error records carry only `status` and `message`; every other field is
/// omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentResponse {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(flatten)]
    pub details: Option<EnrichmentDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentDetails {
    pub instagram_url: Option<String>,
    pub text_message: String,
    pub caption: Option<String>,
    pub tagged_users: Vec<String>,
    pub location: Option<String>,
    pub restaurant_name: String,
    pub needs_manual_caption: bool,
}

impl EnrichmentResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            details: None,
        }
    }
}

impl From<&EnrichmentResult> for EnrichmentResponse {
    fn from(result: &EnrichmentResult) -> Self {
        let metadata = result.metadata.as_ref();
        Self {
            status: ResponseStatus::Success,
            message: result.message.clone(),
            details: Some(EnrichmentDetails {
                instagram_url: Some(result.instagram_url.clone()),
                text_message: result.text_message.clone(),
                caption: metadata.map(|m| m.caption.clone()),
                tagged_users: metadata
                    .map(|m| m.tagged_accounts.clone())
                    .unwrap_or_default(),
                location: metadata.and_then(|m| m.location_name.clone()),
                restaurant_name: result.restaurant_name.clone(),
                needs_manual_caption: result.needs_manual_caption,
            }),
        }
    }
}
