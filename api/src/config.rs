use std::env;
use std::time::Duration;

use crate::domain::entities::{Language, MissingTimestamp};

const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
const MIN_POLL_INTERVAL_MS: u64 = 500;

#[derive(Clone, Debug)]
pub struct Config {
    /// Firestore project hosting the articles collection
    pub firebase_project_id: String,
    /// Web API key appended to Firestore REST calls, if any
    pub firebase_api_key: Option<String>,
    pub firestore_base_url: String,
    pub articles_collection: String,
    /// Maximum number of articles in the feed (`None` = unbounded)
    pub feed_limit: Option<u32>,
    /// How often the Firestore adapter re-runs the live query
    pub feed_poll_interval: Duration,
    /// Which title/description variant the feed displays
    pub feed_language: Language,
    /// Legacy behavior: stamp documents without `created_at` with the current time
    pub created_at_defaults_to_now: bool,
    /// Resend API key; the send-email endpoint answers 500 without it
    pub resend_api_key: Option<String>,
    pub resend_base_url: String,
    pub mail_from: String,
    /// Default recipient when a signup request omits `to`
    pub mail_to: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .unwrap_or_else(|_| "pulse-adc8d".to_string()),
            firebase_api_key: non_empty_var("FIREBASE_API_KEY"),
            firestore_base_url: env::var("FIRESTORE_BASE_URL")
                .unwrap_or_else(|_| "https://firestore.googleapis.com/v1".to_string()),
            articles_collection: env::var("ARTICLES_COLLECTION")
                .unwrap_or_else(|_| "articles".to_string()),
            feed_limit: parse_feed_limit(env::var("FEED_LIMIT").ok().as_deref()),
            feed_poll_interval: parse_poll_interval(
                env::var("FEED_POLL_INTERVAL_MS").ok().as_deref(),
            ),
            feed_language: env::var("FEED_LANGUAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            created_at_defaults_to_now: env::var("CREATED_AT_DEFAULTS_TO_NOW")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            resend_api_key: non_empty_var("RESEND_API_KEY"),
            resend_base_url: env::var("RESEND_BASE_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Pulse Kontakt <kontakt@pulsenewsai.com>".to_string()),
            mail_to: env::var("MAIL_TO").unwrap_or_else(|_| "pulseaiapp8@gmail.com".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }

    /// Policy for documents stored without a `created_at` value
    pub fn missing_created_at(&self) -> MissingTimestamp {
        if self.created_at_defaults_to_now {
            MissingTimestamp::Now
        } else {
            MissingTimestamp::Empty
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// `0` disables the limit; anything unparseable falls back to 20.
fn parse_feed_limit(raw: Option<&str>) -> Option<u32> {
    match raw.map(str::trim).map(str::parse::<u32>) {
        Some(Ok(0)) => None,
        Some(Ok(n)) => Some(n),
        _ => Some(20),
    }
}

/// Milliseconds, never below the floor so the listener cannot spin.
fn parse_poll_interval(raw: Option<&str>) -> Duration {
    let millis = raw
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    Duration::from_millis(millis.max(MIN_POLL_INTERVAL_MS))
}
