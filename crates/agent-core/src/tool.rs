//! Tool System
//!
//! Tools are named, described capabilities the reasoning loop may invoke
//! instead of answering directly. Every registered tool is wrapped in a
//! [`SafeTool`], so a failing, panicking or hanging tool can only ever
//! produce text for the loop to observe.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AgentError, Result};

/// Prefix of every tool failure rendered as an observation
pub const TOOL_ERROR_PREFIX: &str = "[Tool Error]";

/// Per-request data handed to every tool invocation out of band.
///
/// Values here never pass through the model. In particular an uploaded
/// attachment reaches the OCR tool through `attachment`, not through text
/// the model was asked to repeat back.
#[derive(Clone, Debug)]
pub struct RequestContext {
    /// Request identifier, for log correlation
    pub request_id: Uuid,

    /// Location of a file uploaded with this request
    pub attachment: Option<PathBuf>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Tool definition shown to the model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier, matched exactly against `Action:` lines
    pub name: String,

    /// Human-readable description (prompt hint only, never used for dispatch)
    pub description: String,

    /// Category for grouping
    #[serde(default)]
    pub category: Option<String>,
}

impl ToolSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Tool trait - implement to add new capabilities
///
/// Tools must validate their own input: the loop may call any tool with any
/// text, whatever the prompt asks of the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's name and description
    fn schema(&self) -> ToolSchema;

    /// Run the tool on the raw `Action Input` text
    async fn invoke(&self, input: &str, ctx: &RequestContext) -> Result<String>;
}

/// Outcome of one guarded tool invocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum ToolInvocationResult {
    /// The tool ran and produced output
    Observation(String),
    /// The tool failed, was missing, or timed out
    ToolError(String),
}

impl ToolInvocationResult {
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::ToolError(_))
    }

    /// Render as observation text for the scratchpad
    pub fn into_text(self) -> String {
        match self {
            Self::Observation(text) => text,
            Self::ToolError(message) => format!("{TOOL_ERROR_PREFIX} {message}"),
        }
    }
}

/// Safe invocation wrapper around a [`Tool`].
///
/// Converts errors, panics and timeouts into [`ToolInvocationResult::ToolError`].
pub struct SafeTool {
    inner: Arc<dyn Tool>,
    schema: ToolSchema,
    timeout: Option<Duration>,
}

impl SafeTool {
    /// Wrap a tool
    pub fn wrap(tool: Arc<dyn Tool>) -> Self {
        let schema = tool.schema();
        Self {
            inner: tool,
            schema,
            timeout: None,
        }
    }

    /// Bound each invocation by `limit`
    #[must_use]
    pub const fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Invoke the tool; never fails
    pub async fn call(&self, input: &str, ctx: &RequestContext) -> ToolInvocationResult {
        let guarded = AssertUnwindSafe(self.inner.invoke(input, ctx)).catch_unwind();

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, guarded).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    let err = AgentError::Timeout {
                        operation: format!("tool {}", self.schema.name),
                        elapsed: limit,
                    };
                    tracing::warn!(request_id = %ctx.request_id, tool = %self.schema.name, "{err}");
                    return ToolInvocationResult::ToolError(err.to_string());
                }
            },
            None => guarded.await,
        };

        match outcome {
            Ok(Ok(output)) => ToolInvocationResult::Observation(output),
            Ok(Err(e)) => {
                tracing::warn!(request_id = %ctx.request_id, tool = %self.schema.name, error = %e, "Tool failed");
                ToolInvocationResult::ToolError(e.to_string())
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                tracing::error!(request_id = %ctx.request_id, tool = %self.schema.name, %reason, "Tool panicked");
                ToolInvocationResult::ToolError(format!("tool panicked: {reason}"))
            }
        }
    }

    /// Same contract as [`Tool::invoke`] but infallible: failures come back
    /// as text beginning with `[Tool Error]`.
    pub async fn invoke(&self, input: &str, ctx: &RequestContext) -> String {
        self.call(input, ctx).await.into_text()
    }
}

/// Registry for available tools
///
/// Lookup is by exact name. Registration order is kept for prompt rendering.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<SafeTool>>,
    order: Vec<String>,
    timeout: Option<Duration>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            timeout: None,
        }
    }

    /// Apply `limit` to every tool registered afterwards
    #[must_use]
    pub const fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let mut safe = SafeTool::wrap(tool);
        if let Some(limit) = self.timeout {
            safe = safe.with_timeout(limit);
        }

        let name = safe.name().to_string();
        if self.tools.insert(name.clone(), Arc::new(safe)).is_some() {
            tracing::warn!(tool = %name, "Replacing previously registered tool");
        } else {
            self.order.push(name);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<SafeTool>> {
        self.tools.get(name).cloned()
    }

    /// Invoke a tool by exact name. Unknown names become a tool error.
    pub async fn invoke(&self, name: &str, input: &str, ctx: &RequestContext) -> ToolInvocationResult {
        match self.get(name) {
            Some(tool) => tool.call(input, ctx).await,
            None => ToolInvocationResult::ToolError(format!(
                "{}. Available tools: {}",
                AgentError::ToolNotFound(name.to_string()),
                self.names().join(", ")
            )),
        }
    }

    /// Get all tool schemas in registration order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.schema().clone())
            .collect()
    }

    /// Get tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Generate the prompt section describing available tools
    pub fn generate_prompt_section(&self) -> String {
        self.schemas()
            .iter()
            .map(|schema| format!("{}: {}", schema.name, schema.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
