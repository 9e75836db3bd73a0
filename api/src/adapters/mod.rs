//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod firestore;
pub mod resend;

pub use firestore::FirestoreDocumentStore;
pub use resend::ResendMailer;
