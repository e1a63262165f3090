//! Headline retrieval for the pulse sentiment pipeline
//!
//! This crate queries a finance search endpoint (Yahoo Finance by default)
//! for a ticker and reduces the response to a short list of headline titles.

pub mod config;
pub mod error;
pub mod types;
pub mod yahoo;

pub use config::NewsConfig;
pub use error::NewsError;
pub use types::{SearchNewsItem, SearchResponse};
pub use yahoo::{HeadlineSource, NewsClient};
