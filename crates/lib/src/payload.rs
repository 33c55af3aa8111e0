//! # Payload Normalization
//!
//! Inbound webhooks arrive form-encoded (the SMS gateway), as JSON (test and
//! integration clients), or as bare query parameters. This module resolves a
//! raw request into exactly one [`PayloadSource`] and flattens it into an
//! [`InboundMessage`].

use crate::types::InboundMessage;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// The lowercased media type of a `Content-Type` value, without parameters.
fn media_type(content_type: Option<&str>) -> Option<String> {
    content_type.map(|ct| {
        ct.split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    })
}

/// Whether the body must be decoded as `multipart/form-data` before it can
/// be normalized.
pub fn is_multipart(content_type: Option<&str>) -> bool {
    media_type(content_type).as_deref() == Some(MULTIPART_CONTENT_TYPE)
}

/// The transport-level view of an inbound request.
#[derive(Debug, Clone, Default)]
pub struct RawPayload<'a> {
    /// The declared `Content-Type` header, if any.
    pub content_type: Option<&'a str>,
    /// The raw request body.
    pub body: &'a [u8],
    /// Decoded query string parameters.
    pub query: HashMap<String, String>,
    /// Text fields already decoded from a `multipart/form-data` body.
    pub multipart: Option<HashMap<String, String>>,
}

/// Which encoding an inbound payload was resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    Form(HashMap<String, String>),
    Json(HashMap<String, String>),
    Generic(HashMap<String, String>),
}

impl PayloadSource {
    pub fn kind(&self) -> &'static str {
        match self {
            PayloadSource::Form(_) => "form",
            PayloadSource::Json(_) => "json",
            PayloadSource::Generic(_) => "generic",
        }
    }

    pub fn into_fields(self) -> HashMap<String, String> {
        match self {
            PayloadSource::Form(fields)
            | PayloadSource::Json(fields)
            | PayloadSource::Generic(fields) => fields,
        }
    }
}

impl<'a> RawPayload<'a> {
    pub fn new(content_type: Option<&'a str>, body: &'a [u8]) -> Self {
        Self {
            content_type,
            body,
            query: HashMap::new(),
            multipart: None,
        }
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    /// Supplies the text fields of a multipart body. They count as form fields.
    pub fn with_multipart_fields(mut self, fields: HashMap<String, String>) -> Self {
        self.multipart = Some(fields);
        self
    }

    /// Decodes a raw query string. An undecodable query yields no parameters.
    pub fn with_query_string(self, query: Option<&str>) -> Self {
        let query = query
            .and_then(|q| serde_urlencoded::from_str::<HashMap<String, String>>(q).ok())
            .unwrap_or_default();
        self.with_query(query)
    }

    fn media_type(&self) -> Option<String> {
        media_type(self.content_type)
    }

    fn form_fields(&self) -> Option<HashMap<String, String>> {
        if let Some(fields) = self.multipart.as_ref().filter(|fields| !fields.is_empty()) {
            return Some(fields.clone());
        }
        if self.media_type().as_deref() != Some(FORM_CONTENT_TYPE) {
            return None;
        }
        let fields: HashMap<String, String> = serde_urlencoded::from_bytes(self.body).ok()?;
        (!fields.is_empty()).then_some(fields)
    }

    fn json_fields(&self) -> Option<HashMap<String, String>> {
        if self.media_type().as_deref() != Some(JSON_CONTENT_TYPE) {
            return None;
        }
        match serde_json::from_slice::<Value>(self.body) {
            Ok(Value::Object(map)) => Some(
                map.into_iter()
                    .filter_map(|(key, value)| match value {
                        Value::String(s) => Some((key, s)),
                        _ => None,
                    })
                    .collect(),
            ),
            Ok(other) => {
                warn!("JSON payload is not an object (got {other}), ignoring it");
                None
            }
            Err(e) => {
                warn!("Malformed JSON payload, falling back to generic fields: {e}");
                None
            }
        }
    }

    /// Query parameters, overlaid with whatever the body yields when read
    /// leniently as `key=value` pairs. JSON and multipart bodies are not reread.
    fn generic_fields(&self) -> HashMap<String, String> {
        let mut fields = self.query.clone();
        let media_type = self.media_type();
        if media_type.as_deref() != Some(JSON_CONTENT_TYPE)
            && media_type.as_deref() != Some(MULTIPART_CONTENT_TYPE)
        {
            if let Ok(pairs) = serde_urlencoded::from_bytes::<Vec<(String, String)>>(self.body) {
                fields.extend(pairs.into_iter().filter(|(key, _)| !key.is_empty()));
            }
        }
        fields
    }

    /// Picks the payload encoding. The first rule that applies wins:
    /// form fields, then a JSON object body, then the generic merged view.
    pub fn resolve(&self) -> PayloadSource {
        if let Some(fields) = self.form_fields() {
            return PayloadSource::Form(fields);
        }
        if let Some(fields) = self.json_fields() {
            return PayloadSource::Json(fields);
        }
        PayloadSource::Generic(self.generic_fields())
    }
}

/// Normalizes a raw request into an `InboundMessage`. Never fails.
pub fn normalize(raw: &RawPayload<'_>) -> InboundMessage {
    let source = raw.resolve();
    debug!(source = source.kind(), "Resolved inbound payload");
    InboundMessage::new(source.into_fields())
}
