//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use serde_json::json;

use crate::app::MailSettings;
use crate::domain::entities::{Article, PLACEHOLDER_IMAGE};
use crate::domain::ports::{Document, Snapshot};

/// Create a stored document with the given data
pub fn test_document(id: &str, data: serde_json::Value) -> Document {
    Document {
        id: id.to_string(),
        data,
    }
}

/// Create a fully populated stored article document
pub fn test_article_document(id: &str) -> Document {
    test_document(
        id,
        json!({
            "title": format!("Headline {}", id),
            "description": format!("Summary of story {}", id),
            "image_url": format!("https://cdn.example/{}.jpg", id),
            "credibility_score": 80,
            "trend": "rising",
            "source": "Reuters",
            "published_at": {"seconds": 1_700_000_000, "nanoseconds": 0},
            "created_at": "2023-11-14T22:15:00Z",
        }),
    )
}

/// Create a snapshot holding one article document per id, in order
pub fn test_snapshot(ids: &[&str]) -> Snapshot {
    Snapshot::new(ids.iter().map(|id| test_article_document(id)).collect())
}

/// Create a canonical article with default values
pub fn test_article(id: &str) -> Article {
    Article {
        id: id.to_string(),
        title: format!("Headline {}", id),
        description: format!("Summary of story {}", id),
        image_url: PLACEHOLDER_IMAGE.to_string(),
        credibility_score: 80,
        trend: "rising".to_string(),
        source: "Reuters".to_string(),
        published_at: "2023-11-14T22:13:20.000Z".to_string(),
        created_at: "2023-11-14T22:15:00Z".to_string(),
    }
}

/// Create a canonical article with a specific credibility score
pub fn test_article_with_score(id: &str, score: i64) -> Article {
    Article {
        credibility_score: score,
        ..test_article(id)
    }
}

pub fn test_mail_settings() -> MailSettings {
    MailSettings {
        from: "Pulse <noreply@pulse.test>".to_string(),
        default_to: "team@pulse.test".to_string(),
    }
}
