//! News fetcher configuration

use std::env;

/// Default Yahoo Finance search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Settings for [`crate::NewsClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsConfig {
    /// Finance search endpoint, queried with `q`, `esCount` and `newsCount`
    pub base_url: String,
    pub user_agent: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl NewsConfig {
    /// Load from the environment
    ///
    /// Reads:
    /// - USER_AGENT: optional header override
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(agent) = lookup("USER_AGENT").filter(|a| !a.trim().is_empty()) {
            config.user_agent = agent;
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NewsConfig::default();
        assert_eq!(config.base_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn test_user_agent_override() {
        let config = NewsConfig::from_lookup(|name| {
            (name == "USER_AGENT").then(|| "pulse/1.0".to_string())
        });
        assert_eq!(config.user_agent, "pulse/1.0");

        let config = NewsConfig::from_lookup(|_| Some(" ".to_string()));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_builders() {
        let config = NewsConfig::default()
            .with_base_url("http://localhost:9999/search")
            .with_user_agent("pulse-test");
        assert_eq!(config.base_url, "http://localhost:9999/search");
        assert_eq!(config.user_agent, "pulse-test");
    }
}
