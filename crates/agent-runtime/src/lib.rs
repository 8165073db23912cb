//! # agent-runtime
//!
//! Runtime backends for the document agent.
//!
//! ## Backends
//!
//! - **Ollama chat** (default): local LLM inference via `ollama-rs`
//! - **Ollama embeddings**: `/api/embed` over `reqwest`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::ollama::{OllamaConfig, OllamaEmbedder, OllamaProvider};
//!
//! let config = OllamaConfig::from_env();
//! let provider = OllamaProvider::from_config(&config);
//! let embedder = OllamaEmbedder::from_config(&config)?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaEmbedder, OllamaProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, EmbeddingProvider, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
