//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern as a bounded state machine:
//!
//! ```text
//!   ┌───────────┐  tool call   ┌────────┐  result   ┌───────────┐
//!   │ Reasoning │─────────────▶│ Acting │──────────▶│ Observing │
//!   └───────────┘              └────────┘           └───────────┘
//!     │   │   ▲                                           │
//!     │   │   └───────────────────────────────────────────┘
//!     │   │ final answer            iteration / parse-failure cap,
//!     │   ▼                         model timeout
//!     │  Done                                 ▼
//!     └──────────────────────────────────▶ Failed
//! ```
//!
//! An [`Agent`] holds only shared, read-only handles. Every run allocates its
//! own [`Scratchpad`], so one agent can serve concurrent requests.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::parser::{ParsedAction, parse_continuation};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::scratchpad::{AgentAction, AgentStep, Scratchpad};
use crate::tool::{RequestContext, ToolInvocationResult, ToolRegistry};

/// Answer returned when the loop gives up
pub const FAILED_ANSWER: &str = "Agent stopped: could not determine an answer to the question.";

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Instructions placed before the tool list
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Consecutive unparseable continuations tolerated before giving up
    pub max_parse_failures: usize,

    /// Deadline for a single model call
    pub llm_timeout: Duration,

    /// Generation options
    pub generation: GenerationOptions,
}

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 15;
/// Default consecutive parse failure cap
pub const DEFAULT_MAX_PARSE_FAILURES: usize = 3;
/// Default model call deadline
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_parse_failures: DEFAULT_MAX_PARSE_FAILURES,
            llm_timeout: DEFAULT_LLM_TIMEOUT,
            generation: GenerationOptions::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the question as best you can.";

const FORMAT_INSTRUCTIONS: &str = "Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

If no tool is needed, go straight to the Final Answer.";

/// Why a run ended without an answer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    IterationLimit,
    TooManyParseFailures,
    ModelTimeout,
}

/// Terminal state of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum RunStatus {
    Done,
    Failed(FailureReason),
}

/// Everything a run produced
#[derive(Clone, Debug, Serialize)]
pub struct AgentOutcome {
    pub answer: String,
    pub status: RunStatus,
    pub steps: Vec<AgentStep>,
    pub iterations: usize,
}

enum LoopState {
    Reasoning,
    Acting { thought: String, name: String, input: String },
    Observing { step: AgentStep, result: ToolInvocationResult },
    Done(String),
    Failed(FailureReason),
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Build the system prompt including tool descriptions and format rules
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if !self.tools.is_empty() {
            prompt.push_str("\n\nYou have access to the following tools:\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt.push_str("\n\n");
        prompt.push_str(&FORMAT_INSTRUCTIONS.replace("{tool_names}", &self.tools.names().join(", ")));
        prompt
    }

    fn build_user_prompt(query: &str, scratchpad: &Scratchpad, ctx: &RequestContext) -> String {
        let mut prompt = format!("Begin!\n\nQuestion: {query}\n");
        if ctx.attachment.is_some() {
            prompt.push_str("(An image is attached to this request. Tools receive it directly; no file path is needed.)\n");
        }
        prompt.push_str("Thought:");
        prompt.push_str(&scratchpad.render());
        prompt
    }

    /// Answer a query
    pub async fn run(&self, query: &str) -> Result<String> {
        self.run_with_context(query, &RequestContext::new()).await
    }

    /// Answer a query with out-of-band request data (e.g. an attachment)
    pub async fn run_with_context(&self, query: &str, ctx: &RequestContext) -> Result<String> {
        Ok(self.run_detailed(query, ctx).await?.answer)
    }

    /// Answer a query and return the full transcript.
    ///
    /// Tool failures and malformed model output never surface as `Err`; only
    /// a language model backend failure does.
    pub async fn run_detailed(&self, query: &str, ctx: &RequestContext) -> Result<AgentOutcome> {
        let mut scratchpad = Scratchpad::new();
        let mut state = LoopState::Reasoning;
        let mut iterations = 0;
        let mut parse_failures = 0;

        tracing::info!(request_id = %ctx.request_id, "Agent run started");

        loop {
            state = match state {
                LoopState::Reasoning if iterations >= self.config.max_iterations => {
                    LoopState::Failed(FailureReason::IterationLimit)
                }
                LoopState::Reasoning => {
                    iterations += 1;
                    match self.reason(query, &scratchpad, ctx).await {
                        Ok(continuation) => {
                            self.decide(&continuation, &mut scratchpad, &mut parse_failures, ctx)
                        }
                        Err(AgentError::Timeout { elapsed, .. }) => {
                            tracing::warn!(request_id = %ctx.request_id, ?elapsed, "Model call timed out");
                            LoopState::Failed(FailureReason::ModelTimeout)
                        }
                        Err(e) => {
                            tracing::error!(request_id = %ctx.request_id, error = %e, "Model backend failed");
                            return Err(e);
                        }
                    }
                }
                LoopState::Acting { thought, name, input } => {
                    tracing::debug!(request_id = %ctx.request_id, tool = %name, "Executing tool");
                    let result = self.tools.invoke(&name, &input, ctx).await;
                    LoopState::Observing {
                        step: AgentStep {
                            thought,
                            action: AgentAction::ToolCall { name, input },
                            observation: None,
                        },
                        result,
                    }
                }
                LoopState::Observing { mut step, result } => {
                    step.observation = Some(result.into_text());
                    scratchpad.push(step);
                    LoopState::Reasoning
                }
                LoopState::Done(answer) => {
                    tracing::info!(request_id = %ctx.request_id, iterations, "Agent run finished");
                    return Ok(AgentOutcome {
                        answer,
                        status: RunStatus::Done,
                        steps: scratchpad.into_steps(),
                        iterations,
                    });
                }
                LoopState::Failed(reason) => {
                    tracing::warn!(request_id = %ctx.request_id, iterations, ?reason, "Agent run gave up");
                    return Ok(AgentOutcome {
                        answer: FAILED_ANSWER.into(),
                        status: RunStatus::Failed(reason),
                        steps: scratchpad.into_steps(),
                        iterations,
                    });
                }
            };
        }
    }

    /// Branch on the parsed continuation
    fn decide(
        &self,
        continuation: &str,
        scratchpad: &mut Scratchpad,
        parse_failures: &mut usize,
        ctx: &RequestContext,
    ) -> LoopState {
        match parse_continuation(continuation) {
            ParsedAction::ToolCall { thought, name, input } => {
                *parse_failures = 0;
                LoopState::Acting { thought, name, input }
            }
            ParsedAction::FinalAnswer { thought, text } => {
                scratchpad.push(AgentStep {
                    thought,
                    action: AgentAction::FinalAnswer { text: text.clone() },
                    observation: None,
                });
                LoopState::Done(text)
            }
            ParsedAction::ParseFailure { raw, reason } => {
                *parse_failures += 1;
                tracing::debug!(request_id = %ctx.request_id, parse_failures = *parse_failures, "Unparseable continuation");
                scratchpad.push(AgentStep {
                    thought: String::new(),
                    action: AgentAction::ParseFailure { raw },
                    observation: Some(reason),
                });
                if *parse_failures >= self.config.max_parse_failures {
                    LoopState::Failed(FailureReason::TooManyParseFailures)
                } else {
                    LoopState::Reasoning
                }
            }
        }
    }

    /// One model call, bounded by the configured timeout
    async fn reason(&self, query: &str, scratchpad: &Scratchpad, ctx: &RequestContext) -> Result<String> {
        let messages = [
            Message::system(self.build_system_prompt()),
            Message::user(Self::build_user_prompt(query, scratchpad, ctx)),
        ];

        let completion = tokio::time::timeout(
            self.config.llm_timeout,
            self.provider.complete(&messages, &self.config.generation),
        )
        .await
        .map_err(|_| AgentError::Timeout {
            operation: "model completion".into(),
            elapsed: self.config.llm_timeout,
        })??;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                request_id = %ctx.request_id,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Model call finished"
            );
        }
        Ok(completion.content)
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the model provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    #[must_use]
    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    #[must_use]
    pub const fn max_parse_failures(mut self, max: usize) -> Self {
        self.config.max_parse_failures = max;
        self
    }

    #[must_use]
    pub const fn llm_timeout(mut self, limit: Duration) -> Self {
        self.config.llm_timeout = limit;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        if self.config.max_iterations == 0 {
            return Err(AgentError::Config("max_iterations must be at least 1".into()));
        }
        if self.config.max_parse_failures == 0 {
            return Err(AgentError::Config("max_parse_failures must be at least 1".into()));
        }

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::provider::{Completion, ModelInfo};
    use crate::tool::{Tool, ToolSchema};

    /// Replays canned continuations, then repeats the last one
    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(ToString::to_string).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(&self, messages: &[Message], _options: &GenerationOptions) -> Result<Completion> {
            let prompt = messages.iter().map(|m| m.content.clone()).collect::<Vec<_>>().join("\n");
            self.prompts.lock().unwrap().push(prompt);

            let mut replies = self.replies.lock().unwrap();
            let reply = if replies.len() > 1 {
                replies.pop_front().unwrap()
            } else {
                replies.front().cloned().unwrap_or_default()
            };
            Ok(Completion::text(reply, "scripted"))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    /// Answers by echoing the question through the Echo tool
    struct EchoingProvider;

    #[async_trait]
    impl LlmProvider for EchoingProvider {
        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(&self, messages: &[Message], _options: &GenerationOptions) -> Result<Completion> {
            let user = &messages[1].content;
            let reply = if let Some((_, observed)) = user.rsplit_once("Observation: ") {
                let observed = observed.trim_end_matches("\nThought:");
                format!("Thought: I now know the final answer\nFinal Answer: {observed}")
            } else {
                let question = user
                    .lines()
                    .find_map(|l| l.strip_prefix("Question: "))
                    .unwrap_or_default();
                format!("I will echo it.\nAction: Echo\nAction Input: {question}")
            };
            tokio::task::yield_now().await;
            Ok(Completion::text(reply, "echoing"))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    struct DownProvider;

    #[async_trait]
    impl LlmProvider for DownProvider {
        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }

        async fn complete(&self, _messages: &[Message], _options: &GenerationOptions) -> Result<Completion> {
            Err(AgentError::ProviderUnavailable("connection refused".into()))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    struct StalledProvider;

    #[async_trait]
    impl LlmProvider for StalledProvider {
        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(&self, _messages: &[Message], _options: &GenerationOptions) -> Result<Completion> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Completion::text("Final Answer: too late", "stalled"))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema::new("Echo", "Repeat the input.")
        }

        async fn invoke(&self, input: &str, _ctx: &RequestContext) -> Result<String> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(format!("echo: {input}"))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema::new("Broken", "Always fails.")
        }

        async fn invoke(&self, _input: &str, _ctx: &RequestContext) -> Result<String> {
            Err(AgentError::ToolExecution("disk on fire".into()))
        }
    }

    struct AttachmentTool;

    #[async_trait]
    impl Tool for AttachmentTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema::new("OCRTool", "Read the attached image.")
        }

        async fn invoke(&self, _input: &str, ctx: &RequestContext) -> Result<String> {
            let expected = std::path::Path::new("/srv/uploads/abc123.png");
            Ok(match ctx.attachment.as_deref() {
                Some(path) if path == expected => "read the uploaded image".into(),
                Some(_) => "wrong attachment".into(),
                None => "no attachment".into(),
            })
        }
    }

    fn agent_with(provider: Arc<dyn LlmProvider>) -> Agent {
        AgentBuilder::new()
            .provider(provider)
            .tool(EchoTool)
            .tool(FailingTool)
            .tool(AttachmentTool)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_direct_final_answer() {
        let agent = agent_with(Arc::new(ScriptedProvider::new(&[
            "Thought: this is general knowledge\nFinal Answer: Gravity attracts masses.",
        ])));

        let outcome = agent.run_detailed("what is gravity", &RequestContext::new()).await.unwrap();
        assert_eq!(outcome.answer, "Gravity attracts masses.");
        assert_eq!(outcome.status, RunStatus::Done);
        assert_eq!(outcome.iterations, 1);
    }

    #[tokio::test]
    async fn test_tool_call_then_answer() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Action: Echo\nAction Input: ping",
            "Thought: I now know the final answer\nFinal Answer: pong",
        ]));
        let agent = agent_with(provider.clone());

        let outcome = agent.run_detailed("say ping", &RequestContext::new()).await.unwrap();
        assert_eq!(outcome.answer, "pong");
        assert_eq!(outcome.steps.len(), 2);
        assert_eq!(outcome.steps[0].observation.as_deref(), Some("echo: ping"));

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[1].contains("Action: Echo\nAction Input: ping\nObservation: echo: ping\nThought:"));
        assert!(prompts[0].contains("Echo: Repeat the input."));
        assert!(prompts[0].contains("one of [Echo, Broken, OCRTool]"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_observed_not_fatal() {
        let agent = agent_with(Arc::new(ScriptedProvider::new(&[
            "Action: Teleport\nAction Input: mars",
            "Final Answer: cannot teleport",
        ])));

        let outcome = agent.run_detailed("go to mars", &RequestContext::new()).await.unwrap();
        assert_eq!(outcome.answer, "cannot teleport");
        let observation = outcome.steps[0].observation.as_deref().unwrap();
        assert!(observation.starts_with("[Tool Error] Tool not found: Teleport"));
    }

    #[tokio::test]
    async fn test_failing_tool_is_observed_not_fatal() {
        let agent = agent_with(Arc::new(ScriptedProvider::new(&[
            "Action: Broken\nAction Input: x",
            "Final Answer: the tool failed",
        ])));

        let outcome = agent.run_detailed("break it", &RequestContext::new()).await.unwrap();
        assert_eq!(outcome.status, RunStatus::Done);
        assert!(outcome.steps[0].observation.as_deref().unwrap().starts_with("[Tool Error]"));
    }

    #[tokio::test]
    async fn test_unparseable_output_fails_after_parse_cap() {
        let agent = agent_with(Arc::new(ScriptedProvider::new(&["I like turtles."])));

        let outcome = agent.run_detailed("anything", &RequestContext::new()).await.unwrap();
        assert_eq!(outcome.answer, FAILED_ANSWER);
        assert_eq!(outcome.status, RunStatus::Failed(FailureReason::TooManyParseFailures));
        assert_eq!(outcome.iterations, DEFAULT_MAX_PARSE_FAILURES);
    }

    #[tokio::test]
    async fn test_unparseable_output_bounded_by_iteration_cap() {
        let agent = AgentBuilder::new()
            .provider(Arc::new(ScriptedProvider::new(&["I like turtles."])))
            .max_parse_failures(usize::MAX)
            .max_iterations(4)
            .build()
            .unwrap();

        let outcome = agent.run_detailed("anything", &RequestContext::new()).await.unwrap();
        assert_eq!(outcome.status, RunStatus::Failed(FailureReason::IterationLimit));
        assert_eq!(outcome.iterations, 4);
        assert_eq!(outcome.steps.len(), 4);
    }

    #[tokio::test]
    async fn test_endless_tool_calls_hit_iteration_cap() {
        let agent = agent_with(Arc::new(ScriptedProvider::new(&["Action: Echo\nAction Input: again"])));

        let answer = agent.run("loop forever").await.unwrap();
        assert_eq!(answer, FAILED_ANSWER);
    }

    #[tokio::test]
    async fn test_parse_failures_reset_after_valid_action() {
        let agent = agent_with(Arc::new(ScriptedProvider::new(&[
            "garbage",
            "garbage",
            "Action: Echo\nAction Input: hi",
            "garbage",
            "garbage",
            "Final Answer: recovered",
        ])));

        let outcome = agent.run_detailed("q", &RequestContext::new()).await.unwrap();
        assert_eq!(outcome.answer, "recovered");
    }

    #[tokio::test]
    async fn test_backend_outage_is_an_error() {
        let agent = agent_with(Arc::new(DownProvider));
        let err = agent.run("hello").await.unwrap_err();
        assert!(matches!(err, AgentError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_model_timeout_fails_the_run() {
        let agent = AgentBuilder::new()
            .provider(Arc::new(StalledProvider))
            .llm_timeout(Duration::from_millis(20))
            .build()
            .unwrap();

        let outcome = agent.run_detailed("hello", &RequestContext::new()).await.unwrap();
        assert_eq!(outcome.status, RunStatus::Failed(FailureReason::ModelTimeout));
        assert_eq!(outcome.answer, FAILED_ANSWER);
    }

    #[tokio::test]
    async fn test_attachment_travels_out_of_band() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Action: OCRTool\nAction Input: the image",
            "Final Answer: done",
        ]));
        let agent = agent_with(provider.clone());
        let ctx = RequestContext::new().with_attachment("/srv/uploads/abc123.png");

        let outcome = agent.run_detailed("what does it say", &ctx).await.unwrap();
        assert_eq!(
            outcome.steps[0].observation.as_deref(),
            Some("read the uploaded image")
        );
        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts.iter().all(|p| !p.contains("abc123")));
        assert!(prompts[0].contains("An image is attached"));
    }

    #[tokio::test]
    async fn test_concurrent_runs_have_isolated_scratchpads() {
        let agent = Arc::new(agent_with(Arc::new(EchoingProvider)));
        let ctx_a = RequestContext::new();
        let ctx_b = RequestContext::new();

        let (a, b) = tokio::join!(
            agent.run_detailed("alpha question", &ctx_a),
            agent.run_detailed("beta question", &ctx_b),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.answer, "echo: alpha question");
        assert_eq!(b.answer, "echo: beta question");
        let transcript = |o: &AgentOutcome| serde_json::to_string(&o.steps).unwrap();
        assert!(!transcript(&a).contains("beta"));
        assert!(!transcript(&b).contains("alpha"));
        assert_eq!(a.steps.len(), 2);
        assert_eq!(b.steps.len(), 2);
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(matches!(AgentBuilder::new().build(), Err(AgentError::Config(_))));
    }
}
