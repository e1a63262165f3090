//! In-memory doubles shared by the service tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use pulse_core::{NewsBundle, PulseError, PulseResult};
use pulse_news::{HeadlineSource, NewsError};
use pulse_research::{ChatModel, ChatRequest};

use crate::tracer::{SpanSink, TraceRecord};

#[derive(Default)]
pub struct MemorySink {
    traces: Mutex<Vec<TraceRecord>>,
}

impl MemorySink {
    pub fn traces(&self) -> Vec<TraceRecord> {
        self.traces.lock().clone()
    }
}

#[async_trait]
impl SpanSink for MemorySink {
    async fn export(&self, trace: &TraceRecord) -> PulseResult<()> {
        self.traces.lock().push(trace.clone());
        Ok(())
    }
}

pub struct FailingSink;

#[async_trait]
impl SpanSink for FailingSink {
    async fn export(&self, _trace: &TraceRecord) -> PulseResult<()> {
        Err(PulseError::network("collector unreachable"))
    }
}

/// Sink whose export never completes
pub struct StalledSink;

#[async_trait]
impl SpanSink for StalledSink {
    async fn export(&self, _trace: &TraceRecord) -> PulseResult<()> {
        std::future::pending().await
    }
}

/// Headline source returning fixed titles, or a fixed failure
#[derive(Clone, Default)]
pub struct StubNews {
    pub headlines: Vec<String>,
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl StubNews {
    pub fn with_headlines(headlines: &[&str]) -> Self {
        Self {
            headlines: headlines.iter().map(|h| h.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HeadlineSource for StubNews {
    async fn fetch_bundle(&self, ticker: &str) -> Result<NewsBundle, NewsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(NewsError::RequestFailed("connection refused".to_string()));
        }
        Ok(NewsBundle::new(ticker, self.headlines.clone()))
    }
}

/// Chat model returning a fixed reply and recording prompts
#[derive(Clone, Default)]
pub struct CannedModel {
    pub reply: String,
    pub requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl CannedModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatModel for CannedModel {
    async fn complete(&self, request: ChatRequest) -> PulseResult<String> {
        self.requests.lock().push(request);
        Ok(self.reply.clone())
    }
}

/// A schema-conforming reply for `company_name` / `stock_code`
pub fn profile_reply(company_name: &str, stock_code: &str) -> String {
    format!(
        r#"```json
{{
    "company_name": "{company_name}",
    "stock_code": "{stock_code}",
    "newsdesc": "Quarterly results beat expectations.",
    "sentiment": "Positive",
    "people_names": ["Satya Nadella"],
    "places_names": ["Redmond"],
    "other_companies_referred": ["OpenAI"],
    "related_industries": ["Cloud Computing"],
    "market_implications": "Positive momentum expected.",
    "confidence_score": 0.9
}}
```"#
    )
}
