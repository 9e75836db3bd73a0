//! News handlers
//!
//! Read-only views over the live article feed.
//! Supports content negotiation: Accept: text/plain for the text digest, otherwise JSON.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use chrono::Utc;
use futures::stream::{self, Stream};
use serde::Serialize;

use crate::app::FeedState;
use crate::error::AppError;
use crate::feed::{render_cards, render_news, ArticleCard};
use crate::AppState;

/// Check if the client asked for the plain-text digest
fn wants_text(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/plain"))
        .unwrap_or(false)
}

/// JSON view of the feed
#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub status: &'static str,
    pub count: usize,
    pub articles: Vec<ArticleCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NewsResponse {
    fn from_state(state: &FeedState) -> Self {
        let articles = render_cards(state.articles(), Utc::now());
        let message = match state {
            FeedState::Failed { message } => Some(message.clone()),
            _ => None,
        };
        Self {
            status: state.status(),
            count: articles.len(),
            articles,
            message,
        }
    }
}

/// GET /news
///
/// Returns the current feed. Idle and loading feeds come back empty with
/// their status; a failed feed is a 503.
pub async fn get_news(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let feed = state.feed_service.current();

    if let FeedState::Failed { message } = &feed {
        return Err(AppError::FeedUnavailable(message.clone()));
    }

    if wants_text(&headers) {
        Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            render_news(feed.articles(), Utc::now()),
        )
            .into_response())
    } else {
        Ok(Json(NewsResponse::from_state(&feed)).into_response())
    }
}

/// GET /news/:id
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleCard>, AppError> {
    let feed = state.feed_service.current();

    feed.articles()
        .iter()
        .find(|article| article.id == id)
        .map(|article| Json(ArticleCard::from_article(article, Utc::now())))
        .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))
}

/// GET /news/stream
///
/// Server-sent events: the current feed immediately, then one `feed` event
/// per state change.
pub async fn news_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.feed_service.state();

    let events = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first {
            // Sender lives as long as the service; an error means shutdown.
            rx.changed().await.ok()?;
        }
        let feed = rx.borrow_and_update().clone();
        Some((Ok(feed_event(&feed)), (rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn feed_event(feed: &FeedState) -> Event {
    Event::default()
        .event("feed")
        .json_data(NewsResponse::from_state(feed))
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to encode feed event");
            Event::default().event("error").data(e.to_string())
        })
}
