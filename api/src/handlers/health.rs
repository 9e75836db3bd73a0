//! Store probe handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppError;
use crate::AppState;

const PROBE_LIMIT: u32 = 5;

#[derive(Debug, Serialize)]
pub struct StoreProbeResponse {
    pub status: &'static str,
    pub count: usize,
    pub first_title: Option<String>,
}

/// GET /health/store
///
/// Runs the feed query once with a small limit to check the store is
/// reachable and readable.
pub async fn store_probe(
    State(state): State<AppState>,
) -> Result<Json<StoreProbeResponse>, AppError> {
    let articles = state.feed_service.probe(PROBE_LIMIT).await?;

    tracing::info!(count = articles.len(), "Store probe succeeded");
    Ok(Json(StoreProbeResponse {
        status: "ok",
        count: articles.len(),
        first_title: articles.first().map(|a| a.title.clone()),
    }))
}
