pub mod apify;

use crate::{errors::FetchError, types::PostMetadata};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for services that resolve a post URL into its metadata.
///
/// An `Err` is an ordinary outcome (provider down, empty result, timeout) that
/// callers are expected to branch on.
#[async_trait]
pub trait MetadataProvider: Send + Sync + Debug + DynClone {
    async fn fetch(&self, url: &str) -> Result<PostMetadata, FetchError>;
}

dyn_clone::clone_trait_object!(MetadataProvider);
