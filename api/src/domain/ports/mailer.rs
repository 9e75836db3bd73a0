//! Mailer port trait
//!
//! Defines the interface for handing an email to a mail provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MailError;

/// An email ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Provider receipt for an accepted email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentEmail {
    pub id: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail, MailError>;
}
