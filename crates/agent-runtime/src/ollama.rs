//! Ollama Backends
//!
//! `OllamaProvider` implements `LlmProvider` for local Ollama chat inference.
//! `OllamaEmbedder` implements `EmbeddingProvider` over Ollama's `/api/embed`.
//! Both are stateless apart from their HTTP clients, which are safe to
//! share across concurrent requests.

use std::time::Duration;

use agent_core::{
    embedding::EmbeddingProvider,
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{
        Completion, GenerationOptions, LlmProvider, ModelInfo, TokenUsage,
    },
};
use async_trait::async_trait;
use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage, ChatMessageResponse, MessageRole, request::ChatMessageRequest},
    models::ModelOptions as OllamaOptions,
};
use serde::{Deserialize, Serialize};

/// Default embedding model
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";
/// Output dimension of the default embedding model
pub const DEFAULT_EMBED_DIMENSIONS: usize = 768;

/// Ollama provider configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,

    /// HTTP timeout for embedding requests in seconds
    pub timeout_secs: u64,

    /// Embedding model name
    pub embed_model: String,

    /// Expected embedding dimension
    pub embed_dimensions: usize,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
            timeout_secs: 120,
            embed_model: DEFAULT_EMBED_MODEL.into(),
            embed_dimensions: DEFAULT_EMBED_DIMENSIONS,
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = std::env::var("OLLAMA_HOST").unwrap_or(defaults.host);
        let port = std::env::var("OLLAMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let embed_model = std::env::var("EMBED_MODEL").unwrap_or(defaults.embed_model);
        let embed_dimensions = std::env::var("EMBED_DIMENSIONS")
            .ok()
            .and_then(|d| d.parse().ok())
            .unwrap_or(defaults.embed_dimensions);

        Self {
            host,
            port,
            embed_model,
            embed_dimensions,
            ..defaults
        }
    }

    /// Base URL for raw HTTP calls
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.host.trim_end_matches('/'), self.port)
    }
}

/// Ollama LLM provider
pub struct OllamaProvider {
    client: Ollama,
}

impl OllamaProvider {
    /// Create a new Ollama provider with custom host/port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::from_config(&OllamaConfig {
            host: host.into(),
            port,
            ..Default::default()
        })
    }

    /// Create from configuration
    pub fn from_config(config: &OllamaConfig) -> Self {
        Self {
            client: Ollama::new(config.host.clone(), config.port),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(&OllamaConfig::from_env())
    }

    /// Create with default localhost settings
    pub fn localhost() -> Self {
        Self::from_config(&OllamaConfig::default())
    }

    /// Convert agent messages to Ollama format
    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => MessageRole::System,
                    Role::User => MessageRole::User,
                };
                ChatMessage::new(role, m.content.clone())
            })
            .collect()
    }

    /// Convert Ollama response to agent completion
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn convert_completion(response: ChatMessageResponse, model: &str) -> Completion {
        Completion {
            content: response.message.content,
            model: model.to_string(),
            usage: response.final_data.as_ref().map(|d| TokenUsage {
                prompt_tokens: d.prompt_eval_count as u32,
                completion_tokens: d.eval_count as u32,
                total_tokens: (d.prompt_eval_count + d.eval_count) as u32,
            }),
        }
    }

    /// Build Ollama generation options
    #[allow(clippy::cast_possible_wrap)]
    fn build_options(opts: &GenerationOptions) -> OllamaOptions {
        OllamaOptions::default()
            .temperature(opts.temperature)
            .top_p(opts.top_p)
            .num_predict(opts.max_tokens as i32)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn health_check(&self) -> Result<bool> {
        match self.client.list_local_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(&self, messages: &[Message], options: &GenerationOptions) -> Result<Completion> {
        let request = ChatMessageRequest::new(options.model.clone(), Self::convert_messages(messages))
            .options(Self::build_options(options));

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        Ok(Self::convert_completion(response, &options.model))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|m| ModelInfo {
                id: m.name.clone(),
                name: m.name,
            })
            .collect())
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Ollama embedding provider (nomic-embed-text or similar)
pub struct OllamaEmbedder {
    http: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
}

impl OllamaEmbedder {
    /// Create from configuration
    pub fn from_config(config: &OllamaConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            model: config.embed_model.clone(),
            dimensions: config.embed_dimensions,
            timeout,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(&OllamaConfig::from_env())
    }

    fn check_dimensions(&self, vectors: &[Vec<f32>]) -> Result<()> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(AgentError::Embedding(format!(
                "model '{}' returned {} dimensions, expected {}",
                self.model,
                bad.len(),
                self.dimensions
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| AgentError::Embedding("empty embedding response".into()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/embed", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout {
                        operation: "embedding request".into(),
                        elapsed: self.timeout,
                    }
                } else {
                    AgentError::Embedding(format!("Embedding request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(AgentError::Embedding(format!(
                "Embedding failed: HTTP {}",
                response.status()
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Embedding(format!("Invalid embedding response: {e}")))?;

        if body.embeddings.len() != texts.len() {
            return Err(AgentError::Embedding(format!(
                "requested {} embeddings, received {}",
                texts.len(),
                body.embeddings.len()
            )));
        }
        self.check_dimensions(&body.embeddings)?;

        Ok(body.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("Ollama embedding health check failed: {}", e);
                Ok(false)
            }
        }
    }
}
