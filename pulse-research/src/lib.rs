//! Sentiment extraction for the pulse pipeline
//!
//! Renders the analyst prompt, sends it to an Azure OpenAI chat deployment and
//! validates the reply against a fixed ten-field response schema.

pub mod extractor;
pub mod openai;
pub mod parser;
pub mod prompt;
pub mod schema;

pub use extractor::SentimentExtractor;
pub use openai::{check, AzureOpenAIClient, AzureOpenAIConfig, ChatModel, ChatRequest};
pub use parser::{extract_json, parse_sentiment_profile};
pub use prompt::render_sentiment_prompt;
pub use schema::{format_instructions, FieldKind, ResponseField, RESPONSE_SCHEMA};
