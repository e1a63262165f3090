//! Headline data passed from the news fetcher to the sentiment extractor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of headlines kept per bundle
pub const MAX_HEADLINES: usize = 5;

/// Placeholder text handed downstream when a ticker has no headlines
pub const NO_NEWS: &str = "No news found.";

/// Prefix of the text handed downstream when fetching failed
pub const FETCH_ERROR_PREFIX: &str = "Error fetching news: ";

/// Recent headlines for one ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsBundle {
    pub ticker: String,
    /// Titles in the order the search endpoint returned them
    pub headlines: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

impl NewsBundle {
    /// Build a bundle, keeping at most [`MAX_HEADLINES`] titles
    pub fn new(ticker: impl Into<String>, headlines: impl IntoIterator<Item = String>) -> Self {
        Self {
            ticker: ticker.into(),
            headlines: headlines.into_iter().take(MAX_HEADLINES).collect(),
            fetched_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }

    /// Newline-joined headlines, or [`NO_NEWS`] when nothing is left to show
    pub fn to_news_text(&self) -> String {
        let text = self.headlines.join("\n");
        if text.is_empty() {
            NO_NEWS.to_string()
        } else {
            text
        }
    }
}
