//! Structured sentiment extraction over a chat model

use pulse_core::{PulseResult, SentimentProfile};
use tracing::{info, instrument};

use crate::openai::{ChatModel, ChatRequest};
use crate::parser::parse_sentiment_profile;
use crate::prompt::render_sentiment_prompt;

/// Turns headlines into a validated [`SentimentProfile`]
#[derive(Debug, Clone)]
pub struct SentimentExtractor<M> {
    model: M,
}

impl<M: ChatModel> SentimentExtractor<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Prompt the model at temperature 0 and validate its reply
    ///
    /// Schema violations are returned as-is; nothing is retried or repaired.
    #[instrument(skip(self, news_text), fields(news_len = news_text.len()))]
    pub async fn extract(
        &self,
        company_name: &str,
        stock_code: &str,
        news_text: &str,
    ) -> PulseResult<SentimentProfile> {
        let prompt = render_sentiment_prompt(company_name, stock_code, news_text);
        let content = self.model.complete(ChatRequest::user(prompt)).await?;
        let profile = parse_sentiment_profile(&content)?;

        info!(
            "Extracted {} sentiment for {} (confidence {:.2})",
            profile.sentiment, stock_code, profile.confidence_score
        );

        Ok(profile)
    }
}
