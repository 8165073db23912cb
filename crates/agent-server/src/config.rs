//! Server Configuration
//!
//! Every setting has a named default and can be overridden from the
//! environment (after `.env` is loaded).

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use agent_core::{
    AgentConfig,
    provider::{DEFAULT_MODEL, GenerationOptions},
    reasoning::{DEFAULT_LLM_TIMEOUT, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_PARSE_FAILURES},
};
use agent_runtime::OllamaConfig;
use doc_assistant::{ASSISTANT_PROMPT, IngestConfig, knowledge::retriever::DEFAULT_TOP_K};

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub ollama: OllamaConfig,
    pub model: String,
    pub max_iterations: usize,
    pub max_parse_failures: usize,
    pub llm_timeout: Duration,
    pub tool_timeout: Duration,
    pub rag_top_k: usize,
    pub rag_max_distance: Option<f32>,
    pub ingest: IngestConfig,
    pub index_dir: PathBuf,
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub schedule_file: PathBuf,
    pub max_concurrent_requests: usize,
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            model: DEFAULT_MODEL.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_parse_failures: DEFAULT_MAX_PARSE_FAILURES,
            llm_timeout: DEFAULT_LLM_TIMEOUT,
            tool_timeout: Duration::from_secs(60),
            rag_top_k: DEFAULT_TOP_K,
            rag_max_distance: None,
            ingest: IngestConfig::default(),
            index_dir: "vectordb/index".into(),
            data_dir: "data".into(),
            upload_dir: "temp".into(),
            schedule_file: "data/schedule.json".into(),
            max_concurrent_requests: 4,
            bind_addr: "0.0.0.0:3000".into(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            ollama: OllamaConfig::from_env(),
            model: env_or("AGENT_MODEL", d.model),
            max_iterations: env_or("AGENT_MAX_ITERATIONS", d.max_iterations),
            max_parse_failures: env_or("AGENT_MAX_PARSE_FAILURES", d.max_parse_failures),
            llm_timeout: Duration::from_secs(env_or("AGENT_LLM_TIMEOUT_SECS", d.llm_timeout.as_secs())),
            tool_timeout: Duration::from_secs(env_or("AGENT_TOOL_TIMEOUT_SECS", d.tool_timeout.as_secs())),
            rag_top_k: env_or("RAG_TOP_K", d.rag_top_k),
            rag_max_distance: std::env::var("RAG_MAX_DISTANCE").ok().and_then(|v| v.parse().ok()),
            ingest: IngestConfig::from_env(),
            index_dir: env_or("VECTOR_DB_DIR", d.index_dir),
            data_dir: env_or("DATA_DIR", d.data_dir),
            upload_dir: env_or("UPLOAD_DIR", d.upload_dir),
            schedule_file: env_or("SCHEDULE_FILE", d.schedule_file),
            max_concurrent_requests: env_or("MAX_CONCURRENT_REQUESTS", d.max_concurrent_requests).max(1),
            bind_addr: env_or("BIND_ADDR", d.bind_addr),
        }
    }

    /// Reasoning loop settings
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            system_prompt: ASSISTANT_PROMPT.into(),
            max_iterations: self.max_iterations,
            max_parse_failures: self.max_parse_failures,
            llm_timeout: self.llm_timeout,
            generation: GenerationOptions {
                model: self.model.clone(),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model, "llama3.1:8b");
        assert_eq!(config.max_iterations, 15);
        assert_eq!(config.rag_top_k, 4);
        assert_eq!(config.ingest.chunk_size, 500);
        assert_eq!(config.ingest.chunk_overlap, 50);
        assert!(config.rag_max_distance.is_none());
    }

    #[test]
    fn test_agent_config_uses_assistant_prompt() {
        let agent = AppConfig::default().agent_config();
        assert!(agent.system_prompt.contains("TOOL RULES"));
        assert_eq!(agent.generation.model, "llama3.1:8b");
    }
}
