//! Core types for the pulse sentiment pipeline
//!
//! This crate defines the data shared between pipeline stages: the company
//! directory, the headline bundle handed to the extractor, the structured
//! sentiment profile it produces, and the workspace-wide error type.

pub mod company;
pub mod error;
pub mod news;
pub mod profile;

pub use company::{CompanyDirectory, CompanyRecord, UNKNOWN_TICKER};
pub use error::{PulseError, PulseResult};
pub use news::{NewsBundle, FETCH_ERROR_PREFIX, MAX_HEADLINES, NO_NEWS};
pub use profile::{Sentiment, SentimentProfile};
