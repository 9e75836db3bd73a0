//! Firestore REST client implementation
//!
//! Live queries are served by re-running a structured query on an interval
//! and emitting a snapshot whenever the result set differs from the last
//! one delivered. Outages (transport errors, 429, 5xx) are retried on the
//! next tick; any other failure is delivered and ends the listener. The
//! polling task ends as soon as the receiver is dropped.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use urlencoding::encode;

use super::value::{fields_to_json, FirestoreValue};
use crate::domain::ports::{
    CollectionQuery, Direction, Document, DocumentStore, Snapshot, SnapshotStream,
    SNAPSHOT_BUFFER,
};
use crate::error::StoreError;

/// Implementation of the document store on top of the Firestore REST API
pub struct FirestoreDocumentStore {
    http: Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
    poll_interval: Duration,
}

impl FirestoreDocumentStore {
    pub fn new(
        base_url: String,
        project_id: String,
        api_key: Option<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id,
            api_key,
            poll_interval,
        }
    }

    fn run_query_url(&self) -> String {
        let mut url = format!(
            "{}/projects/{}/databases/(default)/documents:runQuery",
            self.base_url,
            encode(&self.project_id)
        );
        if let Some(key) = &self.api_key {
            url.push_str(&format!("?key={}", encode(key)));
        }
        url
    }

    fn runner(&self, query: &CollectionQuery) -> Result<QueryRunner, StoreError> {
        query.validate()?;
        Ok(QueryRunner {
            http: self.http.clone(),
            url: self.run_query_url(),
            body: RunQueryRequest::from(query),
        })
    }
}

/// Request types for the Firestore API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRequest {
    structured_query: StructuredQuery,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StructuredQuery {
    from: Vec<CollectionSelector>,
    order_by: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector {
    collection_id: String,
}

#[derive(Debug, Clone, Serialize)]
struct Order {
    field: FieldReference,
    direction: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReference {
    field_path: String,
}

impl From<&CollectionQuery> for RunQueryRequest {
    fn from(query: &CollectionQuery) -> Self {
        let direction = match query.direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: query.collection.clone(),
                }],
                order_by: vec![Order {
                    field: FieldReference {
                        field_path: query.order_by.clone(),
                    },
                    direction,
                }],
                limit: query.limit,
            },
        }
    }
}

/// Response types for the Firestore API
#[derive(Deserialize)]
struct RunQueryItem {
    // Absent on the bare `{readTime}` entry of an empty result
    #[serde(default)]
    document: Option<FirestoreDocument>,
}

#[derive(Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, FirestoreValue>,
}

impl FirestoreDocument {
    fn into_document(self) -> Document {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Document {
            id,
            data: fields_to_json(self.fields),
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Everything needed to run one query, detached from the store so the
/// polling task can own it
#[derive(Clone)]
struct QueryRunner {
    http: Client,
    url: String,
    body: RunQueryRequest,
}

impl QueryRunner {
    async fn run(&self) -> Result<Snapshot, StoreError> {
        let response = self.http.post(&self.url).json(&self.body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let items: Vec<RunQueryItem> = response
            .json()
            .await
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;

        Ok(Snapshot::new(
            items
                .into_iter()
                .filter_map(|item| item.document)
                .map(FirestoreDocument::into_document)
                .collect(),
        ))
    }
}

async fn poll(
    runner: QueryRunner,
    tx: mpsc::Sender<Result<Snapshot, StoreError>>,
    interval: Duration,
) {
    let mut last: Option<Snapshot> = None;

    loop {
        let result = tokio::select! {
            _ = tx.closed() => break,
            result = runner.run() => result,
        };

        match result {
            Ok(snapshot) => {
                if last.as_ref() != Some(&snapshot) {
                    if tx.send(Ok(snapshot.clone())).await.is_err() {
                        break;
                    }
                    last = Some(snapshot);
                }
            }
            Err(e) if e.is_transient() => {
                tracing::warn!(error = %e, "Firestore query failed, retrying");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Firestore query failed, stopping listener");
                let _ = tx.send(Err(e)).await;
                break;
            }
        }

        tokio::select! {
            _ = tx.closed() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    tracing::debug!("Firestore listener stopped");
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn listen(&self, query: &CollectionQuery) -> Result<SnapshotStream, StoreError> {
        let runner = self.runner(query)?;
        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
        tokio::spawn(poll(runner, tx, self.poll_interval));
        Ok(rx)
    }

    async fn fetch(&self, query: &CollectionQuery) -> Result<Snapshot, StoreError> {
        self.runner(query)?.run().await
    }
}
