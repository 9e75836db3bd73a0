//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::mpsc;

use crate::domain::ports::{
    CollectionQuery, DocumentStore, Mailer, OutgoingEmail, SentEmail, Snapshot, SnapshotStream,
    SNAPSHOT_BUFFER,
};
use crate::error::{MailError, StoreError};

type Listener = mpsc::Sender<Result<Snapshot, StoreError>>;

// ============================================================================
// In-Memory Document Store
// ============================================================================

/// Holds one snapshot, assumed to already be in query order. Only the
/// query's limit is applied.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    snapshot: Arc<RwLock<Snapshot>>,
    listeners: Arc<Mutex<Vec<Listener>>>,
    queries: Arc<RwLock<Vec<CollectionQuery>>>,
    listen_error: Option<String>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with documents for testing
    pub fn with_snapshot(self, snapshot: Snapshot) -> Self {
        *self.snapshot.write().unwrap() = snapshot;
        self
    }

    /// Make every `listen`/`fetch` call fail
    pub fn failing_listen(mut self, message: &str) -> Self {
        self.listen_error = Some(message.to_string());
        self
    }

    /// Replace the stored documents and push the new snapshot to listeners
    pub fn emit(&self, snapshot: Snapshot) {
        *self.snapshot.write().unwrap() = snapshot.clone();
        let listeners = self.listeners.lock().unwrap();
        for listener in listeners.iter() {
            let _ = listener.try_send(Ok(snapshot.clone()));
        }
    }

    /// Push an API error to listeners
    pub fn emit_error(&self, status: u16, message: &str) {
        let listeners = self.listeners.lock().unwrap();
        for listener in listeners.iter() {
            let _ = listener.try_send(Err(StoreError::Api {
                status,
                message: message.to_string(),
            }));
        }
    }

    /// Listeners whose receiving side is still alive
    pub fn active_listeners(&self) -> usize {
        let listeners = self.listeners.lock().unwrap();
        listeners.iter().filter(|l| !l.is_closed()).count()
    }

    pub fn recorded_queries(&self) -> Vec<CollectionQuery> {
        self.queries.read().unwrap().clone()
    }

    fn limited(&self, query: &CollectionQuery) -> Snapshot {
        let snapshot = self.snapshot.read().unwrap();
        let take = query
            .limit
            .map(|l| l as usize)
            .unwrap_or(snapshot.documents.len());
        Snapshot::new(snapshot.documents.iter().take(take).cloned().collect())
    }

    fn check(&self, query: &CollectionQuery) -> Result<(), StoreError> {
        query.validate()?;
        self.queries.write().unwrap().push(query.clone());
        match &self.listen_error {
            Some(message) => Err(StoreError::Api {
                status: 404,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn listen(&self, query: &CollectionQuery) -> Result<SnapshotStream, StoreError> {
        self.check(query)?;

        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
        tx.try_send(Ok(self.limited(query)))
            .map_err(|_| StoreError::Closed)?;
        self.listeners.lock().unwrap().push(tx);
        Ok(rx)
    }

    async fn fetch(&self, query: &CollectionQuery) -> Result<Snapshot, StoreError> {
        self.check(query)?;
        Ok(self.limited(query))
    }
}

// ============================================================================
// Mock Mailer
// ============================================================================

/// Records outgoing emails; can be primed to fail the next send
#[derive(Default)]
pub struct MockMailer {
    sent: Arc<RwLock<Vec<OutgoingEmail>>>,
    failure: Mutex<Option<MailError>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(self, error: MailError) -> Self {
        *self.failure.lock().unwrap() = Some(error);
        self
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.read().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail, MailError> {
        if let Some(error) = self.failure.lock().unwrap().take() {
            return Err(error);
        }

        let mut sent = self.sent.write().unwrap();
        sent.push(email.clone());
        Ok(SentEmail {
            id: format!("email-{}", sent.len()),
        })
    }
}
