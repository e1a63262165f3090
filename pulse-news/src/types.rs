//! Wire types for the Yahoo Finance search endpoint

use serde::Deserialize;

/// Search response; only the news list is consumed
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub news: Option<Vec<SearchNewsItem>>,
}

/// One news hit
#[derive(Debug, Clone, Deserialize)]
pub struct SearchNewsItem {
    #[serde(default)]
    pub title: Option<String>,
}

impl SearchResponse {
    /// Titles of the returned news items in order; missing titles become empty strings
    pub fn titles(&self) -> Vec<String> {
        self.news
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|item| item.title.clone().unwrap_or_default())
            .collect()
    }
}
