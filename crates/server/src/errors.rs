use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use funr::types::{EnrichmentResponse, NO_LINK_MESSAGE};
use tracing::{info, warn};

/// A custom error type for the server application.
///
/// Each variant is converted into the same `{status: "error", message}` body
/// the webhook contract uses, with an appropriate HTTP status.
#[derive(Debug)]
pub enum AppError {
    /// The inbound message did not contain a supported link.
    NoLinkFound,
    /// The request body could not be read.
    UnreadableBody(String),
    /// No route matched the request path.
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            AppError::NoLinkFound => {
                info!("Rejecting message without an Instagram link");
                (StatusCode::BAD_REQUEST, NO_LINK_MESSAGE.to_string())
            }
            AppError::UnreadableBody(reason) => {
                warn!("Could not read webhook body: {reason}");
                (StatusCode::BAD_REQUEST, reason)
            }
            AppError::NotFound(path) => {
                warn!("No route for '{path}'");
                (StatusCode::NOT_FOUND, format!("No route for '{path}'."))
            }
        };

        (status_code, Json(EnrichmentResponse::error(message))).into_response()
    }
}
