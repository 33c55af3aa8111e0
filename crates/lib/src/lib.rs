//! # FUNR: Restaurant Links from Text Messages
//!
//! This crate turns an inbound SMS-style webhook into a structured record: it
//! finds an Instagram link in the message, resolves the post's caption, tagged
//! accounts and location through a scraping provider, and asks an AI provider
//! to name the restaurant being featured.
//!
//! Both outbound calls are best effort. A failed fetch yields a result flagged
//! for manual input; a failed inference yields the name `"Unknown"`.

pub mod errors;
pub mod inference;
pub mod link;
pub mod payload;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod types;

pub use errors::{AiError, FetchError, PipelineError};
pub use inference::NameInferencer;
pub use link::extract_instagram_url;
pub use payload::{normalize, PayloadSource, RawPayload};
pub use pipeline::{EnrichmentPipeline, EnrichmentPipelineBuilder};
pub use types::{
    EnrichmentOutcome, EnrichmentResponse, EnrichmentResult, InboundMessage, PostMetadata,
    ResponseStatus, UNKNOWN_RESTAURANT,
};
