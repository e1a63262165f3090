//! Ticker resolution, news retrieval and sentiment extraction, in sequence

use pulse_core::{CompanyDirectory, PulseResult, SentimentProfile, UNKNOWN_TICKER};
use pulse_news::HeadlineSource;
use pulse_research::{ChatModel, SentimentExtractor};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::tracer::Tracer;

/// Name of the trace grouping one pipeline run
pub const TRACE_NAME: &str = "market_sentiment";

/// What a pipeline run hands back to the caller
///
/// Serializes as the bare profile, or as `{"error": "..."}` when the company
/// could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipelineOutcome {
    Profile(SentimentProfile),
    Unresolved { error: String },
}

impl PipelineOutcome {
    pub fn unresolved(company_name: &str) -> Self {
        PipelineOutcome::Unresolved {
            error: format!("Stock code for {} not found.", company_name),
        }
    }

    pub fn profile(&self) -> Option<&SentimentProfile> {
        match self {
            PipelineOutcome::Profile(profile) => Some(profile),
            PipelineOutcome::Unresolved { .. } => None,
        }
    }
}

/// The three-stage sentiment pipeline over injected service handles
pub struct SentimentPipeline<N, M> {
    directory: CompanyDirectory,
    news: N,
    extractor: SentimentExtractor<M>,
    tracer: Tracer,
}

impl<N, M> SentimentPipeline<N, M>
where
    N: HeadlineSource,
    M: ChatModel,
{
    pub fn new(
        directory: CompanyDirectory,
        news: N,
        extractor: SentimentExtractor<M>,
        tracer: Tracer,
    ) -> Self {
        Self {
            directory,
            news,
            extractor,
            tracer,
        }
    }

    /// Run the pipeline for one company display name
    ///
    /// An unknown company yields [`PipelineOutcome::Unresolved`] without any
    /// outbound calls. News failures flow downstream as text. Schema
    /// violations from the extractor are returned as errors.
    #[instrument(skip(self))]
    pub async fn run(&self, company_name: &str) -> PulseResult<PipelineOutcome> {
        let trace = self
            .tracer
            .trace(TRACE_NAME, json!({ "company_name": company_name }));

        let stock_code = trace
            .span(
                "resolve_ticker",
                json!({ "company_name": company_name }),
                async { self.directory.lookup(company_name).to_string() },
            )
            .await;

        if stock_code == UNKNOWN_TICKER {
            info!("No stock code for {}, stopping", company_name);
            trace.discard();
            return Ok(PipelineOutcome::unresolved(company_name));
        }

        let news = trace
            .span(
                "fetch_news",
                json!({ "stock_code": stock_code }),
                self.news.fetch(&stock_code),
            )
            .await;

        let result = trace
            .try_span(
                "extract_sentiment",
                json!({
                    "company_name": company_name,
                    "stock_code": stock_code,
                    "news": news,
                }),
                self.extractor.extract(company_name, &stock_code, &news),
            )
            .await;

        let output = match &result {
            Ok(profile) => serde_json::to_value(profile).unwrap_or(Value::Null),
            Err(e) => {
                warn!("Sentiment extraction for {} failed: {}", stock_code, e);
                json!({ "error": e.to_string() })
            }
        };
        trace.finish(output).await;

        Ok(PipelineOutcome::Profile(result?))
    }
}
