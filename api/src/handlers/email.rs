//! Email handlers
//!
//! Tester signup form submission.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::app::SignupRequest;
use crate::domain::ports::SentEmail;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: SentEmail,
}

/// POST /api/send-email
///
/// A body that is not a JSON object gets the same 400 as one missing its
/// fields.
pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SendEmailResponse>, AppError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected signup body");
        AppError::BadRequest("Email and message are required".to_string())
    })?;

    let sent = state.mail_service.send_signup(&request).await?;

    Ok(Json(SendEmailResponse {
        success: true,
        message: "Email sent successfully",
        data: sent,
    }))
}
