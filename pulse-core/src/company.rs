//! Static company name to ticker directory

use serde::{Deserialize, Serialize};

/// Sentinel returned by [`CompanyDirectory::lookup`] for names not in the table
pub const UNKNOWN_TICKER: &str = "Unknown";

/// A company known to the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Display name, matched case-sensitively
    pub display_name: String,
    /// Exchange ticker symbol
    pub ticker: String,
}

impl CompanyRecord {
    pub fn new(display_name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ticker: ticker.into(),
        }
    }
}

/// Read-only mapping from company display name to ticker
#[derive(Debug, Clone)]
pub struct CompanyDirectory {
    records: Vec<CompanyRecord>,
}

impl Default for CompanyDirectory {
    fn default() -> Self {
        Self::with_records(vec![
            CompanyRecord::new("Apple Inc", "AAPL"),
            CompanyRecord::new("Microsoft", "MSFT"),
            CompanyRecord::new("Google", "GOOGL"),
        ])
    }
}

impl CompanyDirectory {
    /// Build a directory from an explicit table
    pub fn with_records(records: Vec<CompanyRecord>) -> Self {
        Self { records }
    }

    /// Ticker for `display_name`, if known
    pub fn resolve(&self, display_name: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.display_name == display_name)
            .map(|r| r.ticker.as_str())
    }

    /// Ticker for `display_name`, or [`UNKNOWN_TICKER`]
    pub fn lookup(&self, display_name: &str) -> &str {
        self.resolve(display_name).unwrap_or(UNKNOWN_TICKER)
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }
}
