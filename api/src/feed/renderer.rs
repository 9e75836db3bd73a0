//! Feed renderer
//!
//! Turns mapped articles into card view models and a plain-text digest.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;

use crate::domain::entities::{
    clamp_score, credibility_color, shimmer_duration, Article, ShimmerIntensity,
    PLACEHOLDER_IMAGE,
};

const NO_TITLE: &str = "No title";
const NO_DESCRIPTION: &str = "No description";
const NO_DATE_LABEL: &str = "No date";

/// Legacy "no data" marker some older documents carry instead of a date
const LEGACY_NO_DATE: &str = "brak danych";

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// Everything a client needs to draw one news card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub source: String,
    pub trend: String,
    pub credibility_score: i64,
    /// Bar width in percent, always within 0..=100
    pub credibility_width: i64,
    pub credibility_color: String,
    pub shimmer_intensity: ShimmerIntensity,
    pub shimmer_duration: &'static str,
    pub published_at: String,
    pub created_at: String,
    pub date_label: String,
}

impl ArticleCard {
    pub fn from_article(article: &Article, now: DateTime<Utc>) -> Self {
        let intensity = ShimmerIntensity::from_score(article.credibility_score);
        Self {
            id: article.id.clone(),
            title: or_fallback(&article.title, NO_TITLE),
            description: or_fallback(&article.description, NO_DESCRIPTION),
            image_url: or_fallback(&article.image_url, PLACEHOLDER_IMAGE),
            source: article.source.clone(),
            trend: article.trend.clone(),
            credibility_score: article.credibility_score,
            credibility_width: clamp_score(article.credibility_score),
            credibility_color: credibility_color(article.credibility_score),
            shimmer_intensity: intensity,
            shimmer_duration: shimmer_duration(&intensity.to_string()),
            published_at: article.published_at.clone(),
            created_at: article.created_at.clone(),
            date_label: date_label(&article.created_at, now),
        }
    }
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Build cards for a whole feed, keeping its order
pub fn render_cards(articles: &[Article], now: DateTime<Utc>) -> Vec<ArticleCard> {
    articles
        .iter()
        .map(|article| ArticleCard::from_article(article, now))
        .collect()
}

/// Relative label for a stored date ("5 minutes ago", "in about 2 hours"),
/// or "No date" when there is nothing usable
pub fn date_label(value: &str, now: DateTime<Utc>) -> String {
    if value.is_empty() || value == LEGACY_NO_DATE {
        return NO_DATE_LABEL.to_string();
    }

    match DateTime::parse_from_rfc3339(value) {
        Ok(date) => relative_date(date.with_timezone(&Utc), now),
        Err(_) => NO_DATE_LABEL.to_string(),
    }
}

/// Distance between `date` and `now` in words, with an "ago"/"in" suffix
pub fn relative_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let (earlier, later) = if date <= now { (date, now) } else { (now, date) };
    let distance = distance_in_words(earlier, later);

    if date <= now {
        format!("{} ago", distance)
    } else {
        format!("in {}", distance)
    }
}

fn distance_in_words(earlier: DateTime<Utc>, later: DateTime<Utc>) -> String {
    let seconds = (later - earlier).num_seconds();
    let minutes = (seconds as f64 / 60.0).round() as i64;

    if minutes < 2 {
        return if minutes == 0 {
            "less than a minute".to_string()
        } else {
            "1 minute".to_string()
        };
    }
    if minutes < 45 {
        return format!("{} minutes", minutes);
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes as f64 / 60.0).round() as i64;
        return format!("about {} hours", hours);
    }
    if minutes < 2520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes as f64 / MINUTES_IN_DAY as f64).round() as i64;
        return format!("{} days", days);
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        let months = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return if months == 1 {
            "about 1 month".to_string()
        } else {
            format!("about {} months", months)
        };
    }

    let months = whole_months_between(earlier, later);
    if months < 12 {
        let nearest = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return format!("{} months", nearest);
    }

    let years = months / 12;
    let plural = |n: i64| if n == 1 { "year" } else { "years" };
    match months % 12 {
        0..=2 => format!("about {} {}", years, plural(years)),
        3..=8 => format!("over {} {}", years, plural(years)),
        _ => format!("almost {} years", years + 1),
    }
}

/// Full calendar months from `earlier` to `later`
fn whole_months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = (later.year() - earlier.year()) as i64 * 12
        + later.month() as i64
        - earlier.month() as i64;

    let later_in_month = (later.day(), later.num_seconds_from_midnight());
    let earlier_in_month = (earlier.day(), earlier.num_seconds_from_midnight());
    if months > 0 && later_in_month < earlier_in_month {
        months -= 1;
    }
    months
}

/// Render the feed as a plain-text digest
pub fn render_news(articles: &[Article], now: DateTime<Utc>) -> String {
    let mut buf = String::new();

    buf.push_str("# Top news\n\n");

    if articles.is_empty() {
        buf.push_str("_No articles available._\n");
        return buf;
    }

    for (index, card) in render_cards(articles, now).iter().enumerate() {
        buf.push_str(&render_card(index + 1, card));
        buf.push('\n');
    }

    buf
}

fn render_card(index: usize, card: &ArticleCard) -> String {
    let mut meta_parts = Vec::new();
    meta_parts.push(format!("Credibility: {}%", card.credibility_width));
    if !card.source.is_empty() {
        meta_parts.push(format!("Source: {}", card.source));
    }
    if !card.trend.is_empty() {
        meta_parts.push(format!("Trend: {}", card.trend));
    }
    meta_parts.push(card.date_label.clone());

    format!(
        "[{}] {}\n    {}\n    {}\n",
        index,
        card.title,
        truncate(&card.description, 120),
        meta_parts.join(" | ")
    )
}

/// Truncate a string with ellipsis, on a character boundary
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
