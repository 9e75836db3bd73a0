//! Pulse API Server
//!
//! Serves the Pulse news feed from a live Firestore query, together with the
//! credibility display model, and forwards tester signups to the mail provider.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod feed;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{FirestoreDocumentStore, ResendMailer};
use app::{FeedService, MailService, MailSettings, MapperOptions};
use config::Config;
use domain::ports::{CollectionQuery, DocumentStore, Mailer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub feed_service: Arc<FeedService<dyn DocumentStore>>,
    pub mail_service: Arc<MailService<dyn Mailer>>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    feed: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        feed: state.feed_service.current().status(),
    })
}

/// Assemble the router. `signup` carries the mail routes, rate limited or not.
pub fn build_router(state: AppState, signup: Router<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/store", get(handlers::store_probe))
        .route("/news", get(handlers::get_news))
        .route("/news/stream", get(handlers::news_stream))
        .route("/news/:id", get(handlers::get_article))
        .merge(signup)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pulse_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pulse API...");

    // Load configuration
    let config = Config::from_env();

    // Create adapters
    let store: Arc<dyn DocumentStore> = Arc::new(FirestoreDocumentStore::new(
        config.firestore_base_url.clone(),
        config.firebase_project_id.clone(),
        config.firebase_api_key.clone(),
        config.feed_poll_interval,
    ));

    let mailer = config.resend_api_key.clone().map(|key| {
        Arc::new(ResendMailer::new(config.resend_base_url.clone(), key)) as Arc<dyn Mailer>
    });

    // Create application services
    let feed_service = Arc::new(FeedService::new(
        store,
        CollectionQuery::latest(config.articles_collection.clone(), config.feed_limit),
        MapperOptions {
            language: config.feed_language,
            missing_created_at: config.missing_created_at(),
        },
    ));

    let mail_service = Arc::new(MailService::new(
        mailer,
        MailSettings {
            from: config.mail_from.clone(),
            default_to: config.mail_to.clone(),
        },
    ));
    if !mail_service.is_configured() {
        tracing::warn!("RESEND_API_KEY not set, signup emails will be rejected");
    }

    // The feed keeps serving its state even when the first subscribe fails.
    if feed_service.subscribe().await.is_err() {
        tracing::warn!("Serving without a live article feed");
    }

    let state = AppState {
        feed_service,
        mail_service,
    };

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    let signup = handlers::signup_routes().layer(GovernorLayer {
        config: governor_config,
    });

    let app = build_router(state, signup);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
