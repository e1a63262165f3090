//! Pipeline orchestration for the pulse sentiment analyzer
//!
//! This crate sequences the pipeline stages and reports each stage as a span
//! to an observability collector (Langfuse).

pub mod langfuse;
pub mod pipeline;
pub mod tracer;

#[cfg(test)]
mod testing;

pub use langfuse::{LangfuseConfig, LangfuseSink, DEFAULT_LANGFUSE_HOST};
pub use pipeline::{PipelineOutcome, SentimentPipeline, TRACE_NAME};
pub use tracer::{NoopSink, DEFAULT_EXPORT_TIMEOUT, SpanLevel, SpanRecord, SpanSink, Trace, TraceRecord, Tracer};
