use std::env;
use std::fmt;

use async_openai::{
    config::AzureConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use pulse_core::{PulseError, PulseResult};
use tracing::{debug, instrument};

/// A single chat-completion call
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
}

impl ChatRequest {
    /// A request with one user message at temperature 0
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            system: None,
            user: content.into(),
            temperature: 0.0,
        }
    }

    /// The fixed assistant greeting used to verify a deployment answers
    pub fn greeting() -> Self {
        Self::user("Hello, how are you?")
            .with_system("You are a helpful assistant.")
            .with_temperature(1.0)
    }

    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.system = Some(content.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A chat-completion backend returning the model's raw text
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> PulseResult<String>;
}

/// Round-trip [`ChatRequest::greeting`] through `model`, returning its reply
pub async fn check<M: ChatModel + ?Sized>(model: &M) -> PulseResult<String> {
    let reply = model.complete(ChatRequest::greeting()).await?;
    if reply.trim().is_empty() {
        return Err(PulseError::parse("Empty reply to greeting"));
    }
    Ok(reply)
}

/// Azure OpenAI connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct AzureOpenAIConfig {
    pub api_key: String,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    pub api_version: String,
    pub deployment: String,
}

impl fmt::Debug for AzureOpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAIConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .finish()
    }
}

impl AzureOpenAIConfig {
    /// Load from the environment
    ///
    /// Expects:
    /// - AZURE_OPENAI_API_KEY
    /// - AZURE_OPENAI_ENDPOINT
    /// - AZURE_OPENAI_API_VERSION
    /// - AZURE_OPENAI_DEPLOYMENT_NAME
    pub fn from_env() -> PulseResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup; blank values count as missing
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PulseResult<Self> {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PulseError::config(format!("{} environment variable not set", name)))
        };

        Ok(Self {
            api_key: require("AZURE_OPENAI_API_KEY")?,
            endpoint: require("AZURE_OPENAI_ENDPOINT")?,
            api_version: require("AZURE_OPENAI_API_VERSION")?,
            deployment: require("AZURE_OPENAI_DEPLOYMENT_NAME")?,
        })
    }
}

/// Chat-completion client for an Azure OpenAI deployment
///
/// Construct once and share; the underlying HTTP client pools connections.
#[derive(Debug, Clone)]
pub struct AzureOpenAIClient {
    client: Client<AzureConfig>,
    deployment: String,
}

impl AzureOpenAIClient {
    pub fn new(config: &AzureOpenAIConfig) -> Self {
        let azure = AzureConfig::new()
            .with_api_base(&config.endpoint)
            .with_api_version(&config.api_version)
            .with_deployment_id(&config.deployment)
            .with_api_key(&config.api_key);

        Self {
            client: Client::with_config(azure),
            deployment: config.deployment.clone(),
        }
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// Round-trip a greeting to verify credentials and deployment
    #[instrument(skip(self), fields(deployment = %self.deployment))]
    pub async fn check(&self) -> PulseResult<String> {
        check(self).await
    }
}

#[async_trait]
impl ChatModel for AzureOpenAIClient {
    #[instrument(skip(self, request), fields(deployment = %self.deployment, temperature = request.temperature))]
    async fn complete(&self, request: ChatRequest) -> PulseResult<String> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(|e| PulseError::internal(e.to_string()))?
                    .into(),
            );
        }
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user)
                .build()
                .map_err(|e| PulseError::internal(e.to_string()))?
                .into(),
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.deployment)
            .messages(messages)
            .temperature(request.temperature)
            .build()
            .map_err(|e| PulseError::internal(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PulseError::api(format!("Azure OpenAI API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| PulseError::parse("No response from Azure OpenAI"))?;

        debug!("Received {} chars from model", content.len());

        Ok(content)
    }
}
