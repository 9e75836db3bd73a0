//! Feed module
//!
//! Display model for the article feed: cards and a plain-text digest.

pub mod renderer;

pub use renderer::{render_cards, render_news, ArticleCard};
