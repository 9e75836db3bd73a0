//! Domain entities
//!
//! Core types representing the feed's business concepts.

pub mod article;
pub mod credibility;
pub mod timestamp;

pub use article::{Article, Language, RawArticle, PLACEHOLDER_IMAGE};
pub use credibility::{clamp_score, credibility_color, shimmer_duration, ShimmerIntensity};
pub use timestamp::{normalize_timestamp, MissingTimestamp, RawTimestamp};
