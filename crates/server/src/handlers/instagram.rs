//! # Instagram Webhook Handler
//!
//! Receives SMS webhooks (form-encoded or multipart from the gateway, JSON
//! from test clients) and runs them through the enrichment pipeline.

use super::{AppError, AppState};
use axum::{
    body::Bytes,
    extract::{FromRequest, RawQuery, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use axum_extra::extract::Multipart;
use funr::{
    payload::{is_multipart, RawPayload},
    types::EnrichmentOutcome,
    EnrichmentResponse,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Collects the text parts of a multipart body. File parts are skipped, and a
/// malformed body keeps whatever was decoded before the error.
async fn multipart_text_fields(mut multipart: Multipart) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart payload, keeping {} fields: {e}", fields.len());
                break;
            }
        };
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.text().await {
            Ok(text) => {
                fields.insert(name, text);
            }
            Err(e) => {
                warn!("Unreadable multipart field '{name}': {e}");
                break;
            }
        }
    }
    fields
}

/// Handler for `POST /api/save-instagram-data`.
///
/// Returns the full enrichment record, or a 400 with `{status, message}` when
/// the message has no Instagram link.
pub async fn save_instagram_data_handler(
    State(app_state): State<AppState>,
    RawQuery(query): RawQuery,
    request: Request,
) -> Result<Json<EnrichmentResponse>, AppError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let (body, multipart_fields) = if is_multipart(content_type.as_deref()) {
        let fields = match Multipart::from_request(request, &app_state).await {
            Ok(multipart) => multipart_text_fields(multipart).await,
            Err(e) => {
                warn!("Could not read multipart payload: {e}");
                HashMap::new()
            }
        };
        (Bytes::new(), Some(fields))
    } else {
        let body = Bytes::from_request(request, &app_state)
            .await
            .map_err(|e| AppError::UnreadableBody(e.body_text()))?;
        (body, None)
    };
    debug!(?content_type, body_len = body.len(), "Received webhook payload");

    let mut raw =
        RawPayload::new(content_type.as_deref(), &body).with_query_string(query.as_deref());
    if let Some(fields) = multipart_fields {
        raw = raw.with_multipart_fields(fields);
    }
    let outcome = app_state.pipeline.process_raw(&raw).await;

    match outcome {
        EnrichmentOutcome::NoLinkFound => Err(AppError::NoLinkFound),
        EnrichmentOutcome::Enriched(ref result) => {
            info!(
                url = %result.instagram_url,
                restaurant_name = %result.restaurant_name,
                needs_manual_caption = result.needs_manual_caption,
                "Processed Instagram message"
            );
            Ok(Json(outcome.to_response()))
        }
    }
}
