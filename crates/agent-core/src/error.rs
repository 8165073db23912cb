//! Error Types

use std::time::Duration;

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// A bounded call ran past its deadline
    #[error("{operation} timed out after {elapsed:?}")]
    Timeout { operation: String, elapsed: Duration },

    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool rejected its input
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Embedding backend failure
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Whether the language model or embedding backend itself is down.
    /// These escalate past the reasoning loop instead of becoming observations.
    pub const fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::Provider(_) | Self::ProviderUnavailable(_) | Self::Embedding(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(msg) => format!("The AI service encountered an error: {msg}"),
            Self::ProviderUnavailable(_) => "The AI service is currently unavailable. Please try again.".into(),
            Self::Timeout { .. } => "The request timed out. Please try again.".into(),
            Self::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            Self::ToolValidation(msg) => format!("Invalid tool input: {msg}"),
            Self::ToolExecution(msg) => format!("Tool error: {msg}"),
            Self::Embedding(_) => "The document search service is currently unavailable.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_failures_are_classified() {
        assert!(AgentError::ProviderUnavailable("down".into()).is_backend_failure());
        assert!(AgentError::Embedding("down".into()).is_backend_failure());
        assert!(!AgentError::ToolExecution("boom".into()).is_backend_failure());
    }

    #[test]
    fn test_timeout_message() {
        let err = AgentError::Timeout {
            operation: "tool MathTool".into(),
            elapsed: Duration::from_secs(3),
        };
        assert_eq!(err.to_string(), "tool MathTool timed out after 3s");
        assert_eq!(err.user_message(), "The request timed out. Please try again.");
    }
}
