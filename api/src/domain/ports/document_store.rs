//! Document store port trait
//!
//! Defines the interface to the realtime document store holding articles.
//! A live query is delivered as a channel of snapshots; dropping the
//! receiver cancels the query and lets the adapter release its resources.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::StoreError;

/// Channel capacity for snapshot delivery.
pub const SNAPSHOT_BUFFER: usize = 16;

/// Sort direction for an ordered query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ascending,
    Descending,
}

/// A query against one collection: no filter, one ordering, optional limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub collection: String,
    pub order_by: String,
    pub direction: Direction,
    pub limit: Option<u32>,
}

impl CollectionQuery {
    /// Newest articles first
    pub fn latest(collection: impl Into<String>, limit: Option<u32>) -> Self {
        Self {
            collection: collection.into(),
            order_by: "published_at".to_string(),
            direction: Direction::Descending,
            limit,
        }
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.collection.trim().is_empty() {
            return Err(StoreError::InvalidQuery("empty collection name".to_string()));
        }
        if self.order_by.trim().is_empty() {
            return Err(StoreError::InvalidQuery("empty order field".to_string()));
        }
        Ok(())
    }
}

/// One stored document: its store-assigned id and its data as plain JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: serde_json::Value,
}

/// Full result set of a query at one point in time, in query order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub documents: Vec<Document>,
}

impl Snapshot {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Events of a live query, in the order the store emitted them.
pub type SnapshotStream = mpsc::Receiver<Result<Snapshot, StoreError>>;

/// Client for the realtime document store
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Open a live query. The first snapshot arrives once the initial result
    /// set is known, then again after every change.
    async fn listen(&self, query: &CollectionQuery) -> Result<SnapshotStream, StoreError>;

    /// Run a query once
    async fn fetch(&self, query: &CollectionQuery) -> Result<Snapshot, StoreError>;
}
