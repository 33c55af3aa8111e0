//! # Apify Instagram Scraper
//!
//! Resolves a single post URL through Apify's synchronous
//! `run-sync-get-dataset-items` endpoint and maps the first dataset item into
//! a [`PostMetadata`].

use crate::{errors::FetchError, providers::metadata::MetadataProvider, types::PostMetadata};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_APIFY_API_URL: &str =
    "https://api.apify.com/v2/acts/apify~instagram-scraper/run-sync-get-dataset-items";

/// Scraping runs server-side, so the provider may take minutes to answer.
pub const DEFAULT_APIFY_TIMEOUT: Duration = Duration::from_secs(120);

/// Field names holding the caption, in priority order.
const CAPTION_FIELDS: &[&str] = &["caption"];

/// Field names holding tagged accounts, in priority order. The first field
/// present as an array wins, even when a later one is also present.
const TAGGED_ACCOUNT_FIELDS: &[&str] = &["taggedUsers", "mentions"];

/// Field names holding the account name inside a tagged-account object.
const ACCOUNT_NAME_FIELDS: &[&str] = &["username"];

/// Flat location name, tried before the nested `location.name`.
const LOCATION_NAME_FIELD: &str = "locationName";
const LOCATION_OBJECT_FIELD: &str = "location";

/// Input for the apify/instagram-scraper actor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramScraperInput {
    pub direct_urls: Vec<String>,
    pub results_limit: u32,
    pub results_type: String,
    pub proxy: ProxyConfiguration,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfiguration {
    pub use_apify_proxy: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apify_proxy_groups: Vec<String>,
}

impl Default for ProxyConfiguration {
    fn default() -> Self {
        Self {
            use_apify_proxy: true,
            apify_proxy_groups: vec!["RESIDENTIAL".to_string()],
        }
    }
}

impl InstagramScraperInput {
    pub fn single_post(url: &str, proxy: ProxyConfiguration) -> Self {
        Self {
            direct_urls: vec![url.to_string()],
            results_limit: 1,
            results_type: "posts".to_string(),
            proxy,
        }
    }
}

/// A metadata provider backed by the Apify Instagram scraper.
#[derive(Clone, Debug)]
pub struct ApifyProvider {
    client: ReqwestClient,
    api_url: String,
    api_token: String,
    proxy: ProxyConfiguration,
}

impl ApifyProvider {
    pub fn new(
        api_url: String,
        api_token: String,
        proxy: ProxyConfiguration,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_token,
            proxy,
        })
    }
}

#[async_trait]
impl MetadataProvider for ApifyProvider {
    async fn fetch(&self, url: &str) -> Result<PostMetadata, FetchError> {
        info!(url, "Requesting post metadata from Apify");
        let input = InstagramScraperInput::single_post(url, self.proxy.clone());

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&input)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let items: Vec<Value> = response.json().await?;
        debug!(count = items.len(), payload = ?items, "Apify dataset items");

        let first = items
            .first()
            .ok_or_else(|| FetchError::EmptyResult(url.to_string()))?;
        Ok(post_metadata_from_item(first))
    }
}

fn first_string<'a>(item: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .find_map(|field| item.get(*field).and_then(Value::as_str))
}

fn account_name(entry: &Value) -> Option<String> {
    let name = match entry {
        Value::String(name) => Some(name.as_str()),
        Value::Object(_) => first_string(entry, ACCOUNT_NAME_FIELDS),
        _ => None,
    }?;
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Maps one scraper dataset item into `PostMetadata`.
pub fn post_metadata_from_item(item: &Value) -> PostMetadata {
    let caption = first_string(item, CAPTION_FIELDS)
        .unwrap_or_default()
        .to_string();

    let tagged_accounts = TAGGED_ACCOUNT_FIELDS
        .iter()
        .find_map(|field| item.get(*field).and_then(Value::as_array))
        .map(|entries| entries.iter().filter_map(account_name).collect())
        .unwrap_or_default();

    let location_name = item
        .get(LOCATION_NAME_FIELD)
        .and_then(Value::as_str)
        .and_then(non_blank)
        .or_else(|| {
            item.get(LOCATION_OBJECT_FIELD)
                .and_then(|location| location.get("name"))
                .and_then(Value::as_str)
                .and_then(non_blank)
        });

    PostMetadata {
        caption,
        tagged_accounts,
        location_name,
    }
}
