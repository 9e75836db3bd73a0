//! Unified error types for the Pulse API
//!
//! This module defines error types for each layer:
//! - `StoreError`: Document store client errors
//! - `MailError`: Mail provider client errors
//! - `AppError`: Application layer errors (wraps the above for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Document store client errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Listener closed")]
    Closed,
}

impl StoreError {
    /// Failures worth retrying: transport errors, throttling and 5xx answers.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Request(_) => true,
            StoreError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Mail provider errors
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Mail API key not configured")]
    MailNotConfigured,

    #[error("Feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (StatusCode::BAD_GATEWAY, "Store error", Some(e.to_string()))
            }
            AppError::Mail(e) => {
                tracing::error!("Mail provider error: {}", e);
                let details = match e {
                    MailError::Api { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send email",
                    Some(details),
                )
            }
            // Message text is what the signup form shows to the user.
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str(), None),
            AppError::MailNotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Resend API key not configured. Please set RESEND_API_KEY in your environment.",
                None,
            ),
            AppError::FeedUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Feed unavailable",
                Some(msg.clone()),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
