//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod article_mapper;
pub mod feed_service;
pub mod mail_service;

pub use article_mapper::MapperOptions;
pub use feed_service::{FeedService, FeedState};
pub use mail_service::{MailService, MailSettings, SignupRequest};
