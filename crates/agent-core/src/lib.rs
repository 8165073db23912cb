//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM and embedding abstractions
//! and a guarded tool system.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Agent                               │
//! │  ┌─────────────┐  ┌──────────────┐  ┌────────────────────┐   │
//! │  │  Reasoning  │  │ ToolRegistry │  │    LlmProvider     │   │
//! │  │    Loop     │──│  (SafeTool)  │──│    (Strategy)      │   │
//! │  └─────────────┘  └──────────────┘  └────────────────────┘   │
//! │        │                                                     │
//! │  ┌─────────────┐  ┌──────────────┐                           │
//! │  │   Parser    │  │  Scratchpad  │  (one per run)            │
//! │  └─────────────┘  └──────────────┘                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` and `EmbeddingProvider` traits let the agent and the
//! retrieval pipeline run on Ollama or any other backend without changing
//! agent logic.

pub mod embedding;
pub mod error;
pub mod message;
pub mod parser;
pub mod provider;
pub mod reasoning;
pub mod scratchpad;
pub mod tool;

pub use embedding::EmbeddingProvider;
pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use parser::{ParsedAction, parse_continuation};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentBuilder, AgentConfig, AgentOutcome, FailureReason, RunStatus};
pub use scratchpad::{AgentAction, AgentStep, Scratchpad};
pub use tool::{RequestContext, SafeTool, Tool, ToolInvocationResult, ToolRegistry, ToolSchema};
