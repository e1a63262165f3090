//! Prompt rendering for sentiment extraction

use crate::schema::format_instructions;

/// Render the analyst prompt for one company and its headlines
pub fn render_sentiment_prompt(company_name: &str, stock_code: &str, news: &str) -> String {
    format!(
        r#"You are a financial analyst. Analyze the following news about {company_name} (stock code: {stock_code}) and provide a structured sentiment profile.

News: {news}

- Classify the sentiment as Positive, Negative, or Neutral.
- Extract named entities (people, places, other companies).
- Identify related industries and market implications.
- Provide a confidence score for your sentiment analysis (between 0 and 1).

Format your response according to the following schema:
{instructions}
"#,
        company_name = company_name,
        stock_code = stock_code,
        news = news,
        instructions = format_instructions(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_inputs() {
        let prompt = render_sentiment_prompt(
            "Microsoft",
            "MSFT",
            "Microsoft beats estimates\nAzure growth slows",
        );

        assert!(prompt.contains("news about Microsoft (stock code: MSFT)"));
        assert!(prompt.contains("News: Microsoft beats estimates\nAzure growth slows"));
        assert!(prompt.contains("Positive, Negative, or Neutral"));
        assert!(prompt.contains("\"market_implications\": string"));
    }

    #[test]
    fn test_prompt_passes_error_text_through() {
        let prompt = render_sentiment_prompt("Google", "GOOGL", "Error fetching news: timed out");
        assert!(prompt.contains("News: Error fetching news: timed out"));
    }
}
