//! # Metadata Provider Tests
//!
//! Verifies how the Apify provider maps responses and which outcomes it
//! reports as fetch failures.

use anyhow::Result;
use funr::errors::FetchError;
use funr::providers::metadata::{
    apify::{ApifyProvider, ProxyConfiguration},
    MetadataProvider,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POST_URL: &str = "https://www.instagram.com/reel/ABC123xyz/";
const RUN_PATH: &str = "/v2/acts/apify~instagram-scraper/run-sync-get-dataset-items";

fn provider_for(server: &MockServer, timeout: Duration) -> Result<ApifyProvider> {
    Ok(ApifyProvider::new(
        format!("{}{RUN_PATH}", server.uri()),
        "apify-token".to_string(),
        ProxyConfiguration::default(),
        timeout,
    )?)
}

#[tokio::test]
async fn test_fetch_maps_first_result() -> Result<()> {
    // --- 1. Arrange ---
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .and(header("authorization", "Bearer apify-token"))
        .and(body_json(json!({
            "directUrls": [POST_URL],
            "resultsLimit": 1,
            "resultsType": "posts",
            "proxy": {"useApifyProxy": true, "apifyProxyGroups": ["RESIDENTIAL"]}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {
                "caption": "Best tacos in town @chefmike",
                "taggedUsers": [{"username": "chefmike"}],
                "locationName": "Taco Place"
            },
            {"caption": "second result is ignored"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // --- 2. Act ---
    let metadata = provider_for(&server, Duration::from_secs(5))?
        .fetch(POST_URL)
        .await?;

    // --- 3. Assert ---
    assert_eq!(metadata.caption, "Best tacos in town @chefmike");
    assert_eq!(metadata.tagged_accounts, vec!["chefmike"]);
    assert_eq!(metadata.location_name.as_deref(), Some("Taco Place"));
    Ok(())
}

#[tokio::test]
async fn test_fetch_reports_empty_result() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = provider_for(&server, Duration::from_secs(5))?.fetch(POST_URL).await;
    assert!(matches!(result, Err(FetchError::EmptyResult(url)) if url == POST_URL));
    Ok(())
}

#[tokio::test]
async fn test_fetch_reports_error_status() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(402).set_body_string("Monthly usage exceeded"))
        .mount(&server)
        .await;

    let result = provider_for(&server, Duration::from_secs(5))?.fetch(POST_URL).await;
    match result {
        Err(FetchError::Api { status, body }) => {
            assert_eq!(status, 402);
            assert!(body.contains("usage exceeded"));
        }
        other => panic!("Expected Api error, but got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_fetch_reports_timeout() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"caption": "too late"}]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = provider_for(&server, Duration::from_millis(200))?
        .fetch(POST_URL)
        .await;
    assert!(matches!(result, Err(FetchError::Timeout(_))));
    Ok(())
}

#[tokio::test]
async fn test_fetch_reports_undecodable_body() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "not an array"})))
        .mount(&server)
        .await;

    let result = provider_for(&server, Duration::from_secs(5))?.fetch(POST_URL).await;
    assert!(matches!(result, Err(FetchError::Deserialization(_))));
    Ok(())
}

#[tokio::test]
async fn test_fetch_reports_unreachable_provider() -> Result<()> {
    let provider = ApifyProvider::new(
        "http://127.0.0.1:9/unreachable".to_string(),
        "apify-token".to_string(),
        ProxyConfiguration::default(),
        Duration::from_secs(2),
    )?;

    let result = provider.fetch(POST_URL).await;
    assert!(result.is_err());
    Ok(())
}
