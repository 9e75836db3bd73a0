//! Feed service
//!
//! Keeps one live query open against the articles collection and publishes
//! the mapped article list through a watch channel. Every snapshot replaces
//! the list wholesale; nothing is patched incrementally.
//!
//! Each subscription gets a generation number. The delivery task may only
//! write the feed state while its generation is the live one, and the check
//! and the write happen under the same lock teardown takes. A snapshot that
//! is still being mapped when the subscription is torn down is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::article_mapper::{map_snapshot, MapperOptions};
use crate::domain::entities::Article;
use crate::domain::ports::{CollectionQuery, DocumentStore, SnapshotStream};
use crate::error::StoreError;

/// What the feed currently shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedState {
    /// No subscription is active
    Idle,
    /// Subscribed, waiting for the first snapshot
    Loading,
    Ready { articles: Vec<Article> },
    /// Delivery stopped; needs a new subscription
    Failed { message: String },
}

impl FeedState {
    pub fn status(&self) -> &'static str {
        match self {
            FeedState::Idle => "idle",
            FeedState::Loading => "loading",
            FeedState::Ready { .. } => "ready",
            FeedState::Failed { .. } => "failed",
        }
    }

    pub fn articles(&self) -> &[Article] {
        match self {
            FeedState::Ready { articles } => articles,
            _ => &[],
        }
    }
}

/// Gate between subscriptions and the published feed state
struct FeedWriter {
    live: Mutex<Option<u64>>,
    state: watch::Sender<FeedState>,
}

impl FeedWriter {
    fn new() -> Self {
        let (state, _) = watch::channel(FeedState::Idle);
        Self {
            live: Mutex::new(None),
            state,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<u64>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open(&self, generation: u64) {
        let mut live = self.lock();
        *live = Some(generation);
        self.state.send_replace(FeedState::Loading);
    }

    /// Publish `state` if `generation` is still live.
    fn apply(&self, generation: u64, state: FeedState) -> bool {
        let live = self.lock();
        if *live != Some(generation) {
            return false;
        }
        self.state.send_replace(state);
        true
    }

    fn close(&self, generation: u64) -> bool {
        let mut live = self.lock();
        if *live != Some(generation) {
            return false;
        }
        *live = None;
        self.state.send_replace(FeedState::Idle);
        true
    }
}

/// Handle to one live query. Dropping it tears the subscription down.
pub struct FeedSubscription {
    generation: u64,
    writer: Arc<FeedWriter>,
    task: JoinHandle<()>,
}

impl FeedSubscription {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        if self.writer.close(self.generation) {
            tracing::info!(generation = self.generation, "Unsubscribed from article feed");
        }
        // The task owns the snapshot stream; aborting it drops the receiver,
        // which tells the store adapter to stop.
        self.task.abort();
    }
}

/// Service owning the live article subscription
pub struct FeedService<S>
where
    S: DocumentStore + ?Sized,
{
    store: Arc<S>,
    query: CollectionQuery,
    options: MapperOptions,
    writer: Arc<FeedWriter>,
    next_generation: AtomicU64,
    active: tokio::sync::Mutex<Option<FeedSubscription>>,
}

impl<S> FeedService<S>
where
    S: DocumentStore + ?Sized,
{
    pub fn new(store: Arc<S>, query: CollectionQuery, options: MapperOptions) -> Self {
        Self {
            store,
            query,
            options,
            writer: Arc::new(FeedWriter::new()),
            next_generation: AtomicU64::new(1),
            active: tokio::sync::Mutex::new(None),
        }
    }

    /// Open the live query, replacing any active subscription.
    ///
    /// A setup failure leaves the feed in the `failed` state and is also
    /// returned to the caller.
    pub async fn subscribe(&self) -> Result<u64, StoreError> {
        let mut active = self.active.lock().await;

        // Tear down first so two subscriptions never deliver at once.
        if let Some(previous) = active.take() {
            tracing::info!(
                generation = previous.generation(),
                "Replacing active feed subscription"
            );
            drop(previous);
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.writer.open(generation);

        tracing::info!(
            generation,
            collection = %self.query.collection,
            limit = ?self.query.limit,
            "Starting article feed subscription"
        );

        let stream = match self.store.listen(&self.query).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(generation, error = %e, "Failed to open feed subscription");
                self.writer.apply(
                    generation,
                    FeedState::Failed {
                        message: e.to_string(),
                    },
                );
                return Err(e);
            }
        };

        let task = tokio::spawn(deliver(
            generation,
            stream,
            self.writer.clone(),
            self.options,
        ));

        *active = Some(FeedSubscription {
            generation,
            writer: self.writer.clone(),
            task,
        });

        Ok(generation)
    }

    /// Cancel the live query and clear the feed. Returns false if nothing
    /// was subscribed.
    pub async fn unsubscribe(&self) -> bool {
        self.active.lock().await.take().is_some()
    }

    pub async fn is_subscribed(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// A receiver that observes every state change from now on
    pub fn state(&self) -> watch::Receiver<FeedState> {
        self.writer.state.subscribe()
    }

    pub fn current(&self) -> FeedState {
        self.writer.state.borrow().clone()
    }

    /// Run the feed query once, bypassing the live subscription
    pub async fn probe(&self, limit: u32) -> Result<Vec<Article>, StoreError> {
        let query = self.query.clone().with_limit(Some(limit));
        let snapshot = self.store.fetch(&query).await?;
        Ok(map_snapshot(&snapshot, &self.options))
    }
}

async fn deliver(
    generation: u64,
    mut stream: SnapshotStream,
    writer: Arc<FeedWriter>,
    options: MapperOptions,
) {
    while let Some(event) = stream.recv().await {
        match event {
            Ok(snapshot) => {
                tracing::info!(
                    generation,
                    count = snapshot.len(),
                    "Received article snapshot"
                );
                let articles = map_snapshot(&snapshot, &options);
                if !writer.apply(generation, FeedState::Ready { articles }) {
                    return;
                }
            }
            Err(e) => {
                tracing::error!(generation, error = %e, "Article feed subscription error");
                writer.apply(
                    generation,
                    FeedState::Failed {
                        message: e.to_string(),
                    },
                );
                return;
            }
        }
    }

    tracing::warn!(generation, "Article feed stream ended");
    writer.apply(
        generation,
        FeedState::Failed {
            message: StoreError::Closed.to_string(),
        },
    );
}
