//! Article domain entity
//!
//! `RawArticle` is the loose shape of a stored document: every field optional,
//! wrong-typed fields read as absent. `Article` is the canonical record the
//! feed hands to its consumers.

use serde::{Deserialize, Deserializer, Serialize};

use super::RawTimestamp;

/// Image shown when an article has no usable `image_url`.
pub const PLACEHOLDER_IMAGE: &str = "/news-placeholder.png";

/// Read a field leniently: null or a value of the wrong type becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Scores arrive as integers, floats, or numeric strings.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64),
        _ => None,
    })
}

/// Display language for title/description variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Pl,
    #[default]
    En,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Pl => write!(f, "pl"),
            Language::En => write!(f, "en"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pl" | "polish" => Ok(Language::Pl),
            "en" | "english" => Ok(Language::En),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

/// A stored article document as delivered by the store
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawArticle {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title_en: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title_pl: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description_en: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description_pl: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub credibility_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub trend: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(default)]
    pub published_at: Option<RawTimestamp>,
    #[serde(default)]
    pub created_at: Option<RawTimestamp>,
}

impl RawArticle {
    /// Total conversion; anything that is not an object reads as empty.
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Title variant for `language`, if one is stored
    pub fn localized_title(&self, language: Language) -> Option<&str> {
        match language {
            Language::En => self.title_en.as_deref(),
            Language::Pl => self.title_pl.as_deref(),
        }
    }

    /// Description variant for `language`, if one is stored
    pub fn localized_description(&self, language: Language) -> Option<&str> {
        match language {
            Language::En => self.description_en.as_deref(),
            Language::Pl => self.description_pl.as_deref(),
        }
    }
}

/// Canonical article record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Stored value, not clamped
    pub credibility_score: i64,
    pub trend: String,
    pub source: String,
    /// ISO-8601, or empty when unknown
    pub published_at: String,
    /// ISO-8601, or empty when unknown
    pub created_at: String,
}
