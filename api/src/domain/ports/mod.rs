//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod document_store;
pub mod mailer;

pub use document_store::{
    CollectionQuery, Direction, Document, DocumentStore, Snapshot, SnapshotStream,
    SNAPSHOT_BUFFER,
};
pub use mailer::{Mailer, OutgoingEmail, SentEmail};
