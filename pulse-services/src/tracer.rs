//! Span recording around pipeline stages
//!
//! A [`Trace`] groups the spans of one pipeline run. Spans are buffered in
//! memory and handed to a [`SpanSink`] when the trace finishes; export
//! failures and exports exceeding the deadline are logged and never reach
//! the caller.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use pulse_core::PulseResult;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

/// Severity attached to a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpanLevel {
    Default,
    Error,
}

/// One timed stage invocation
#[derive(Debug, Clone, Serialize)]
pub struct SpanRecord {
    pub id: String,
    pub trace_id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub input: Value,
    pub output: Value,
    pub level: SpanLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

/// A finished trace with its spans, ready for export
#[derive(Debug, Clone, Serialize)]
pub struct TraceRecord {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub input: Value,
    pub output: Value,
    pub spans: Vec<SpanRecord>,
}

/// Destination for finished traces
#[async_trait]
pub trait SpanSink: Send + Sync {
    async fn export(&self, trace: &TraceRecord) -> PulseResult<()>;
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl SpanSink for NoopSink {
    async fn export(&self, _trace: &TraceRecord) -> PulseResult<()> {
        Ok(())
    }
}

/// Upper bound on a single trace export
pub const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Factory for traces sharing one sink
#[derive(Clone)]
pub struct Tracer {
    sink: Arc<dyn SpanSink>,
    export_timeout: Duration,
}

impl Tracer {
    pub fn new(sink: Arc<dyn SpanSink>) -> Self {
        Self {
            sink,
            export_timeout: DEFAULT_EXPORT_TIMEOUT,
        }
    }

    pub fn with_export_timeout(mut self, export_timeout: Duration) -> Self {
        self.export_timeout = export_timeout;
        self
    }

    /// Tracer whose traces go nowhere
    pub fn noop() -> Self {
        Self::new(Arc::new(NoopSink))
    }

    /// Open a new trace
    pub fn trace(&self, name: &str, input: Value) -> Trace {
        Trace {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            timestamp: Utc::now(),
            input,
            spans: Mutex::new(Vec::new()),
            sink: Arc::clone(&self.sink),
            export_timeout: self.export_timeout,
        }
    }
}

/// An open trace collecting spans for one pipeline run
pub struct Trace {
    id: String,
    name: String,
    timestamp: DateTime<Utc>,
    input: Value,
    spans: Mutex<Vec<SpanRecord>>,
    sink: Arc<dyn SpanSink>,
    export_timeout: Duration,
}

impl Trace {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run `stage` inside a named span, recording its output
    pub async fn span<T, F>(&self, name: &str, input: Value, stage: F) -> T
    where
        F: Future<Output = T>,
        T: Serialize,
    {
        let start_time = Utc::now();
        let output = stage.await;
        self.record(name, start_time, input, to_value(&output), SpanLevel::Default, None);
        output
    }

    /// Like [`Trace::span`] for fallible stages; errors are recorded at ERROR level
    pub async fn try_span<T, E, F>(&self, name: &str, input: Value, stage: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Display,
    {
        let start_time = Utc::now();
        let result = stage.await;
        match &result {
            Ok(output) => {
                self.record(name, start_time, input, to_value(output), SpanLevel::Default, None)
            }
            Err(e) => self.record(
                name,
                start_time,
                input,
                Value::Null,
                SpanLevel::Error,
                Some(e.to_string()),
            ),
        }
        result
    }

    /// Spans recorded so far
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.spans.lock().clone()
    }

    /// Close the trace and export it, giving up after the export timeout
    pub async fn finish(self, output: Value) {
        let record = TraceRecord {
            id: self.id,
            name: self.name,
            timestamp: self.timestamp,
            input: self.input,
            output,
            spans: self.spans.into_inner(),
        };

        match tokio::time::timeout(self.export_timeout, self.sink.export(&record)).await {
            Ok(Ok(())) => debug!("Exported trace {} with {} spans", record.id, record.spans.len()),
            Ok(Err(e)) => warn!("Failed to export trace {}: {}", record.id, e),
            Err(_) => warn!(
                "Exporting trace {} timed out after {:?}, dropping it",
                record.id, self.export_timeout
            ),
        }
    }

    /// Close the trace without exporting it
    pub fn discard(self) {
        debug!("Discarding trace {}", self.id);
    }

    fn record(
        &self,
        name: &str,
        start_time: DateTime<Utc>,
        input: Value,
        output: Value,
        level: SpanLevel,
        status_message: Option<String>,
    ) {
        let span = SpanRecord {
            id: Uuid::new_v4().to_string(),
            trace_id: self.id.clone(),
            name: name.to_string(),
            start_time,
            end_time: Utc::now(),
            input,
            output,
            level,
            status_message,
        };
        self.spans.lock().push(span);
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
