//! Yahoo Finance search client for ticker headlines

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, info, instrument, warn};

use pulse_core::{NewsBundle, FETCH_ERROR_PREFIX, MAX_HEADLINES};

use crate::config::NewsConfig;
use crate::error::NewsError;
use crate::types::SearchResponse;

/// A source of recent headlines for a ticker
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// Fetch up to [`MAX_HEADLINES`] headlines for `ticker`
    async fn fetch_bundle(&self, ticker: &str) -> Result<NewsBundle, NewsError>;

    /// Headlines as newline-joined text
    ///
    /// Never fails: an empty result becomes "No news found." and any fetch
    /// error becomes "Error fetching news: <message>".
    async fn fetch(&self, ticker: &str) -> String {
        match self.fetch_bundle(ticker).await {
            Ok(bundle) => bundle.to_news_text(),
            Err(e) => {
                warn!("News fetch for {} failed, continuing with error text: {}", ticker, e);
                format!("{}{}", FETCH_ERROR_PREFIX, e)
            }
        }
    }
}

/// Client for the finance search endpoint
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    config: NewsConfig,
}

impl NewsClient {
    /// Create a new client; the underlying HTTP client keeps its default timeouts
    pub fn new(config: NewsConfig) -> Result<Self, NewsError> {
        let client = Client::builder()
            .build()
            .map_err(|e| NewsError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl HeadlineSource for NewsClient {
    #[instrument(skip(self))]
    async fn fetch_bundle(&self, ticker: &str) -> Result<NewsBundle, NewsError> {
        let news_count = MAX_HEADLINES.to_string();

        debug!("Searching news for {} at {}", ticker, self.config.base_url);

        let response = self
            .client
            .get(&self.config.base_url)
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(&[
                ("q", ticker),
                ("esCount", "1"),
                ("newsCount", news_count.as_str()),
            ])
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NewsError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| NewsError::ParseError(e.to_string()))?;

        let bundle = NewsBundle::new(ticker, search.titles());

        info!("Fetched {} headlines for {}", bundle.headlines.len(), ticker);

        Ok(bundle)
    }
}
