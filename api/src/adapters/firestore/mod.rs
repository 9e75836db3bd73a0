//! Firestore adapter
//!
//! Reads article documents through the Firestore REST API.

mod client;
mod value;

pub use client::FirestoreDocumentStore;
