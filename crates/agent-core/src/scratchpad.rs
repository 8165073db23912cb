//! Scratchpad
//!
//! Per-request transcript of reasoning steps. A scratchpad is created by
//! each agent run, appended to only by that run, and dropped when the run
//! returns.

use serde::{Deserialize, Serialize};

/// What the model decided in one step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentAction {
    ToolCall { name: String, input: String },
    FinalAnswer { text: String },
    ParseFailure { raw: String },
}

/// One reasoning step
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentStep {
    pub thought: String,
    pub action: AgentAction,
    pub observation: Option<String>,
}

/// Ordered, append-only list of steps for one query
#[derive(Clone, Debug, Default, Serialize)]
pub struct Scratchpad {
    steps: Vec<AgentStep>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: AgentStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[AgentStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<AgentStep> {
        self.steps
    }

    /// Render steps in the ReAct transcript format, ending ready for the
    /// model's next `Thought:`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            if !step.thought.is_empty() {
                out.push(' ');
                out.push_str(&step.thought);
                out.push('\n');
            }
            match &step.action {
                AgentAction::ToolCall { name, input } => {
                    out.push_str(&format!("Action: {name}\nAction Input: {input}\n"));
                }
                AgentAction::FinalAnswer { text } => {
                    out.push_str(&format!("Final Answer: {text}\n"));
                }
                AgentAction::ParseFailure { raw } => {
                    if step.thought.is_empty() && !raw.is_empty() {
                        out.push(' ');
                        out.push_str(raw);
                        out.push('\n');
                    }
                }
            }
            if let Some(observation) = &step.observation {
                out.push_str(&format!("Observation: {observation}\nThought:"));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tool_step() {
        let mut pad = Scratchpad::new();
        pad.push(AgentStep {
            thought: "I should add.".into(),
            action: AgentAction::ToolCall {
                name: "MathTool".into(),
                input: "3+4".into(),
            },
            observation: Some("7".into()),
        });

        assert_eq!(
            pad.render(),
            " I should add.\nAction: MathTool\nAction Input: 3+4\nObservation: 7\nThought:"
        );
    }

    #[test]
    fn test_render_parse_failure_keeps_raw_text() {
        let mut pad = Scratchpad::new();
        pad.push(AgentStep {
            thought: String::new(),
            action: AgentAction::ParseFailure { raw: "hmm".into() },
            observation: Some("Invalid Format".into()),
        });

        assert_eq!(pad.render(), " hmm\nObservation: Invalid Format\nThought:");
        assert_eq!(pad.len(), 1);
    }
}
