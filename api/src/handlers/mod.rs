//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod email;
pub mod health;
pub mod news;

use axum::{routing::post, Router};

pub use email::send_email;
pub use health::store_probe;
pub use news::{get_article, get_news, news_stream};

use crate::AppState;

/// Routes that get a per-IP rate limit in production
pub fn signup_routes() -> Router<AppState> {
    Router::new().route("/api/send-email", post(send_email))
}
