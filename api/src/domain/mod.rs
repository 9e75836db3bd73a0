//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Articles, timestamps and the credibility encoding
//! - `ports`: Trait definitions for the document store and the mailer

pub mod entities;
pub mod ports;
