//! Resend API client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::ports::{Mailer, OutgoingEmail, SentEmail};
use crate::error::MailError;

/// Implementation of the mailer on top of the Resend API
pub struct ResendMailer {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ResendMailer {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, MailError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| MailError::Deserialization(e.to_string()))
        } else {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            Err(MailError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail, MailError> {
        let response = self
            .http
            .post(self.api_url("/emails"))
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let sent: SentEmail = self.handle_response(response).await?;
        tracing::info!(email_id = %sent.id, to = ?email.to, "Email accepted by Resend");
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    use crate::test_utils::spawn_test_server;

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    async fn start(status: StatusCode, body: Value) -> (ResendMailer, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route(
                "/emails",
                post(
                    move |State(captured): State<Captured>,
                          headers: HeaderMap,
                          Json(request): Json<Value>| {
                        let body = body.clone();
                        async move {
                            let auth = headers
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            captured.lock().unwrap().push((auth, request));
                            (status, Json(body))
                        }
                    },
                ),
            )
            .with_state(captured.clone());
        let base_url = spawn_test_server(app).await;
        (ResendMailer::new(base_url, "re_test".to_string()), captured)
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            from: "Pulse <noreply@pulse.test>".to_string(),
            to: vec!["team@pulse.test".to_string()],
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
            reply_to: Some("tester@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn posts_email_with_bearer_key() {
        let (mailer, captured) = start(StatusCode::OK, json!({"id": "abc-123"})).await;

        let sent = mailer.send(&email()).await.unwrap();
        assert_eq!(sent.id, "abc-123");

        let captured = captured.lock().unwrap();
        let (auth, body) = &captured[0];
        assert_eq!(auth.as_deref(), Some("Bearer re_test"));
        assert_eq!(
            body,
            &json!({
                "from": "Pulse <noreply@pulse.test>",
                "to": ["team@pulse.test"],
                "subject": "Hello",
                "html": "<p>Hi</p>",
                "reply_to": "tester@example.com",
            })
        );
    }

    #[tokio::test]
    async fn provider_rejection_surfaces_its_message() {
        let (mailer, _) = start(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "statusCode": 422,
                "message": "Invalid `from` field.",
                "name": "validation_error",
            }),
        )
        .await;

        match mailer.send(&email()).await.unwrap_err() {
            MailError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Invalid `from` field.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_deserialization_error() {
        let (mailer, _) = start(StatusCode::OK, json!({"unexpected": true})).await;

        let err = mailer.send(&email()).await.unwrap_err();
        assert!(matches!(err, MailError::Deserialization(_)));
    }
}
