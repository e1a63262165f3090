//! Structured sentiment profile produced by the extractor

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Overall tone of the news for a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Parse a label in any letter case
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Models are inconsistent about casing, so accept any.
impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Sentiment::from_label(&label).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid sentiment '{}', expected Positive, Negative or Neutral",
                label
            ))
        })
    }
}

/// Sentiment analysis result for one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentProfile {
    pub company_name: String,
    pub stock_code: String,
    /// Summary of the news
    pub newsdesc: String,
    pub sentiment: Sentiment,
    pub people_names: Vec<String>,
    pub places_names: Vec<String>,
    pub other_companies_referred: Vec<String>,
    pub related_industries: Vec<String>,
    pub market_implications: String,
    /// Prompted to lie in 0..=1 but not clamped
    pub confidence_score: f64,
}
