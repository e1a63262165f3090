//! Langfuse ingestion sink for pipeline traces

use std::env;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pulse_core::{PulseError, PulseResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::tracer::{SpanLevel, SpanRecord, SpanSink, TraceRecord};

/// Default Langfuse cloud host
pub const DEFAULT_LANGFUSE_HOST: &str = "https://cloud.langfuse.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Langfuse credentials and host
#[derive(Clone, PartialEq, Eq)]
pub struct LangfuseConfig {
    pub public_key: String,
    pub secret_key: String,
    pub host: String,
}

impl fmt::Debug for LangfuseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangfuseConfig")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .field("host", &self.host)
            .finish()
    }
}

impl LangfuseConfig {
    /// Load from the environment
    ///
    /// Expects:
    /// - LANGFUSE_PUBLIC_KEY
    /// - LANGFUSE_SECRET_KEY
    /// - LANGFUSE_HOST (optional, defaults to Langfuse cloud)
    pub fn from_env() -> PulseResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup; blank values count as missing
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PulseResult<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &str| {
            get(name)
                .ok_or_else(|| PulseError::config(format!("{} environment variable not set", name)))
        };

        Ok(Self {
            public_key: require("LANGFUSE_PUBLIC_KEY")?,
            secret_key: require("LANGFUSE_SECRET_KEY")?,
            host: get("LANGFUSE_HOST").unwrap_or_else(|| DEFAULT_LANGFUSE_HOST.to_string()),
        })
    }
}

#[derive(Debug, Serialize)]
struct IngestionRequest {
    batch: Vec<IngestionEvent>,
}

#[derive(Debug, Serialize)]
struct IngestionEvent {
    id: String,
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    event_type: &'static str,
    body: Value,
}

/// Multi-status reply; rejected events are listed in `errors`
#[derive(Debug, Default, Deserialize)]
struct IngestionResponse {
    #[serde(default)]
    successes: Vec<Value>,
    #[serde(default)]
    errors: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TraceBody<'a> {
    id: &'a str,
    name: &'a str,
    timestamp: DateTime<Utc>,
    input: &'a Value,
    output: &'a Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpanBody<'a> {
    id: &'a str,
    trace_id: &'a str,
    name: &'a str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    input: &'a Value,
    output: &'a Value,
    level: SpanLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_message: Option<&'a str>,
}

/// Exports traces to the Langfuse public ingestion API
pub struct LangfuseSink {
    client: Client,
    config: LangfuseConfig,
}

impl LangfuseSink {
    pub fn new(config: LangfuseConfig) -> PulseResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PulseError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn ingestion_url(&self) -> String {
        format!("{}/api/public/ingestion", self.config.host.trim_end_matches('/'))
    }
}

#[async_trait]
impl SpanSink for LangfuseSink {
    #[instrument(skip(self, trace), fields(trace_id = %trace.id, spans = trace.spans.len()))]
    async fn export(&self, trace: &TraceRecord) -> PulseResult<()> {
        let request = build_ingestion_request(trace)?;

        let response = self
            .client
            .post(self.ingestion_url())
            .basic_auth(&self.config.public_key, Some(&self.config.secret_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| PulseError::network(format!("Langfuse request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PulseError::api(format!(
                "Langfuse ingestion error ({}): {}",
                status, body
            )));
        }

        let ingestion: IngestionResponse = response.json().await.unwrap_or_default();
        if !ingestion.errors.is_empty() {
            warn!(
                "Langfuse rejected {} of {} events: {}",
                ingestion.errors.len(),
                request.batch.len(),
                serde_json::Value::Array(ingestion.errors)
            );
        } else {
            debug!(
                "Langfuse accepted {} of {} events",
                ingestion.successes.len(),
                request.batch.len()
            );
        }
        Ok(())
    }
}

fn build_ingestion_request(trace: &TraceRecord) -> PulseResult<IngestionRequest> {
    let mut batch = Vec::with_capacity(trace.spans.len() + 1);

    batch.push(IngestionEvent {
        id: Uuid::new_v4().to_string(),
        timestamp: trace.timestamp,
        event_type: "trace-create",
        body: serde_json::to_value(TraceBody {
            id: &trace.id,
            name: &trace.name,
            timestamp: trace.timestamp,
            input: &trace.input,
            output: &trace.output,
        })
        .map_err(|e| PulseError::internal(e.to_string()))?,
    });

    for span in &trace.spans {
        batch.push(IngestionEvent {
            id: Uuid::new_v4().to_string(),
            timestamp: span.start_time,
            event_type: "span-create",
            body: span_body(span)?,
        });
    }

    Ok(IngestionRequest { batch })
}

fn span_body(span: &SpanRecord) -> PulseResult<Value> {
    serde_json::to_value(SpanBody {
        id: &span.id,
        trace_id: &span.trace_id,
        name: &span.name,
        start_time: span.start_time,
        end_time: span.end_time,
        input: &span.input,
        output: &span.output,
        level: span.level,
        status_message: span.status_message.as_deref(),
    })
    .map_err(|e| PulseError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::tracer::Tracer;

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    async fn serve_collector(captured: Captured) -> String {
        let router = Router::new()
            .route(
                "/api/public/ingestion",
                post(
                    |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        captured.lock().push((auth, body));
                        Json(json!({ "successes": [], "errors": [] }))
                    },
                ),
            )
            .with_state(captured);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(host: String) -> LangfuseConfig {
        LangfuseConfig {
            public_key: "pk-lf-test".to_string(),
            secret_key: "sk-lf-test".to_string(),
            host,
        }
    }

    #[test]
    fn test_config_from_lookup() {
        let vars = HashMap::from([
            ("LANGFUSE_PUBLIC_KEY", "pk".to_string()),
            ("LANGFUSE_SECRET_KEY", "sk".to_string()),
        ]);
        let config = LangfuseConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(config.host, DEFAULT_LANGFUSE_HOST);
        assert!(!format!("{:?}", config).contains("\"sk\""));

        let vars = HashMap::from([("LANGFUSE_SECRET_KEY", "sk".to_string())]);
        let err = LangfuseConfig::from_lookup(|name| vars.get(name).cloned()).unwrap_err();
        assert!(err.to_string().contains("LANGFUSE_PUBLIC_KEY"));
    }

    #[tokio::test]
    async fn test_export_posts_trace_and_spans_with_basic_auth() {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let host = serve_collector(captured.clone()).await;
        let sink = LangfuseSink::new(config(format!("{}/", host))).unwrap();
        let tracer = Tracer::new(Arc::new(sink));

        let trace = tracer.trace("market_sentiment", json!({ "company_name": "Microsoft" }));
        let trace_id = trace.id().to_string();
        trace
            .span("resolve_ticker", json!({ "company_name": "Microsoft" }), async { "MSFT" })
            .await;
        let _: Result<(), String> = trace
            .try_span("extract_sentiment", json!({}), async { Err("Missing fields".to_string()) })
            .await;
        trace.finish(json!({ "error": "Missing fields" })).await;

        let requests = captured.lock().clone();
        assert_eq!(requests.len(), 1);
        let (auth, body) = &requests[0];

        // base64("pk-lf-test:sk-lf-test")
        assert_eq!(auth.as_deref(), Some("Basic cGstbGYtdGVzdDpzay1sZi10ZXN0"));

        let batch = body["batch"].as_array().unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0]["type"], "trace-create");
        assert_eq!(batch[0]["body"]["id"], trace_id.as_str());
        assert_eq!(batch[0]["body"]["name"], "market_sentiment");
        assert_eq!(batch[1]["type"], "span-create");
        assert_eq!(batch[1]["body"]["traceId"], trace_id.as_str());
        assert_eq!(batch[1]["body"]["name"], "resolve_ticker");
        assert_eq!(batch[1]["body"]["output"], "MSFT");
        assert_eq!(batch[1]["body"]["level"], "DEFAULT");
        assert_eq!(batch[2]["body"]["level"], "ERROR");
        assert_eq!(batch[2]["body"]["statusMessage"], "Missing fields");
    }

    #[test]
    fn test_ingestion_response_lists_rejections() {
        let body = json!({
            "successes": [{ "id": "a", "status": 201 }],
            "errors": [{ "id": "b", "status": 400, "message": "Invalid request data" }]
        });
        let parsed: IngestionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.successes.len(), 1);
        assert_eq!(parsed.errors.len(), 1);

        let parsed: IngestionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.errors.is_empty());
    }

    #[tokio::test]
    async fn test_partial_rejection_is_not_an_export_error() {
        let router = Router::new().route(
            "/api/public/ingestion",
            post(|| async {
                (
                    StatusCode::MULTI_STATUS,
                    Json(json!({
                        "successes": [],
                        "errors": [{ "id": "x", "status": 400, "message": "Invalid request data" }]
                    })),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let sink = LangfuseSink::new(config(format!("http://{}", addr))).unwrap();
        let record = TraceRecord {
            id: "t-2".to_string(),
            name: "market_sentiment".to_string(),
            timestamp: Utc::now(),
            input: Value::Null,
            output: Value::Null,
            spans: Vec::new(),
        };

        assert!(sink.export(&record).await.is_ok());
    }

    #[tokio::test]
    async fn test_export_reports_unreachable_collector() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = LangfuseSink::new(config(format!("http://{}", addr))).unwrap();
        let record = TraceRecord {
            id: "t-1".to_string(),
            name: "market_sentiment".to_string(),
            timestamp: Utc::now(),
            input: Value::Null,
            output: Value::Null,
            spans: Vec::new(),
        };

        let err = sink.export(&record).await.unwrap_err();
        assert!(matches!(err, PulseError::Network(_)));
    }
}
