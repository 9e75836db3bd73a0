//! Mail service
//!
//! Forwards tester signup requests from the landing page to the mail
//! provider. Stateless: one request in, one provider call out.

use std::sync::Arc;

use htmlescape::encode_minimal;
use serde::Deserialize;

use crate::domain::ports::{Mailer, OutgoingEmail, SentEmail};
use crate::error::AppError;

pub const SIGNUP_SUBJECT: &str = "Nowe zgłoszenie testera - Pulse App";

/// Body of a signup request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Overrides the configured recipient
    #[serde(default)]
    pub to: Option<String>,
}

/// Sender and default recipient
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from: String,
    pub default_to: String,
}

pub struct MailService<M>
where
    M: Mailer + ?Sized,
{
    mailer: Option<Arc<M>>,
    settings: MailSettings,
}

impl<M> MailService<M>
where
    M: Mailer + ?Sized,
{
    /// `mailer` is `None` when no provider key is configured; every send then
    /// fails with `AppError::MailNotConfigured`.
    pub fn new(mailer: Option<Arc<M>>, settings: MailSettings) -> Self {
        Self { mailer, settings }
    }

    pub fn is_configured(&self) -> bool {
        self.mailer.is_some()
    }

    pub async fn send_signup(&self, request: &SignupRequest) -> Result<SentEmail, AppError> {
        let email = required(request.email.as_deref());
        let message = required(request.message.as_deref());
        let (Some(email), Some(message)) = (email, message) else {
            return Err(AppError::BadRequest(
                "Email and message are required".to_string(),
            ));
        };

        let mailer = self.mailer.as_ref().ok_or(AppError::MailNotConfigured)?;

        let to = required(request.to.as_deref())
            .unwrap_or(&self.settings.default_to)
            .to_string();

        let outgoing = OutgoingEmail {
            from: self.settings.from.clone(),
            to: vec![to],
            subject: SIGNUP_SUBJECT.to_string(),
            html: render_signup_html(email, message),
            reply_to: Some(email.to_string()),
        };

        match mailer.send(&outgoing).await {
            Ok(sent) => {
                tracing::info!(id = %sent.id, "Signup email sent");
                Ok(sent)
            }
            Err(e) => {
                tracing::error!(error = %e, "Signup email failed");
                Err(e.into())
            }
        }
    }
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn render_signup_html(email: &str, message: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #333; margin-bottom: 20px;">Nowe zgłoszenie testera</h2>
  <div style="background-color: #f5f5f5; padding: 15px; border-radius: 8px; margin-bottom: 20px;">
    <p><strong>Email:</strong> {}</p>
    <p><strong>Wiadomość:</strong></p>
    <p style="white-space: pre-wrap;">{}</p>
  </div>
  <p style="color: #666; font-size: 14px;">To zgłoszenie zostało wysłane z formularza na stronie Pulse App.</p>
</div>"#,
        encode_minimal(email),
        encode_minimal(message)
    )
}
