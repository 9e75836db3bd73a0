//! Article record mapper
//!
//! Turns stored documents into canonical `Article`s. Mapping is total: every
//! field has a fallback, so a snapshot always maps to exactly as many
//! articles as it has documents, in the same order.

use crate::domain::entities::{
    normalize_timestamp, Article, Language, MissingTimestamp, RawArticle, PLACEHOLDER_IMAGE,
};
use crate::domain::ports::{Document, Snapshot};

/// Knobs for article mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapperOptions {
    pub language: Language,
    pub missing_created_at: MissingTimestamp,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Map one stored document to an article.
pub fn map_article(id: &str, raw: &RawArticle, options: &MapperOptions) -> Article {
    let title = non_empty(raw.localized_title(options.language))
        .or(raw.title.as_deref())
        .unwrap_or_default();
    let description = non_empty(raw.localized_description(options.language))
        .or(raw.description.as_deref())
        .unwrap_or_default();

    Article {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image_url: non_empty(raw.image_url.as_deref())
            .unwrap_or(PLACEHOLDER_IMAGE)
            .to_string(),
        credibility_score: raw.credibility_score.unwrap_or(0),
        trend: raw.trend.clone().unwrap_or_default(),
        source: raw.source.clone().unwrap_or_default(),
        published_at: normalize_timestamp(raw.published_at.as_ref(), MissingTimestamp::Empty),
        created_at: normalize_timestamp(raw.created_at.as_ref(), options.missing_created_at),
    }
}

pub fn map_document(document: &Document, options: &MapperOptions) -> Article {
    let raw = RawArticle::from_value(document.data.clone());
    let article = map_article(&document.id, &raw, options);
    tracing::debug!(
        id = %article.id,
        has_title = !article.title.is_empty(),
        has_published_at = !article.published_at.is_empty(),
        "Mapped article document"
    );
    article
}

/// Map a whole snapshot, preserving the store's order.
pub fn map_snapshot(snapshot: &Snapshot, options: &MapperOptions) -> Vec<Article> {
    snapshot
        .documents
        .iter()
        .map(|doc| map_document(doc, options))
        .collect()
}
