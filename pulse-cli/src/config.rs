//! Startup configuration

use std::env;

use pulse_core::PulseResult;
use pulse_news::NewsConfig;
use pulse_research::AzureOpenAIConfig;
use pulse_services::LangfuseConfig;

/// Everything the analyzer needs, validated once before any network traffic
#[derive(Debug, Clone)]
pub struct PulseConfig {
    pub news: NewsConfig,
    pub azure: AzureOpenAIConfig,
    pub langfuse: LangfuseConfig,
}

impl PulseConfig {
    pub fn from_env() -> PulseResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PulseResult<Self> {
        Ok(Self {
            news: NewsConfig::from_lookup(&lookup),
            azure: AzureOpenAIConfig::from_lookup(&lookup)?,
            langfuse: LangfuseConfig::from_lookup(&lookup)?,
        })
    }
}
