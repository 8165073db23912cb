//! Continuation Parser
//!
//! Turns free-form model output into one of three tagged shapes the
//! reasoning loop can branch on:
//!
//! ```text
//! Thought: I should compute this.          -> ToolCall { name, input }
//! Action: MathTool
//! Action Input: 3 + 4
//!
//! Thought: I now know the final answer.    -> FinalAnswer { text }
//! Final Answer: 7
//!
//! anything else                            -> ParseFailure { raw }
//! ```

use serde::{Deserialize, Serialize};

const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const FINAL_ANSWER: &str = "Final Answer:";
const OBSERVATION: &str = "Observation:";
const THOUGHT: &str = "Thought:";

/// Parsed model continuation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParsedAction {
    /// The model wants to call a tool
    ToolCall {
        thought: String,
        name: String,
        input: String,
    },
    /// The model produced its answer
    FinalAnswer { thought: String, text: String },
    /// Output matched neither shape
    ParseFailure { raw: String, reason: String },
}

/// Parse one model continuation.
///
/// Anything from a model-written `Observation:` line onwards is dropped:
/// observations come from tools, never from the model. If both an action
/// and a final answer are present, the earlier marker wins.
pub fn parse_continuation(text: &str) -> ParsedAction {
    let text = truncate_at_observation(text);

    let action_at = find_marker(text, ACTION);
    let answer_at = text.find(FINAL_ANSWER);

    match (action_at, answer_at) {
        (Some(a), Some(f)) if f < a => final_answer(text, f),
        (Some(a), _) => tool_call(text, a),
        (None, Some(f)) => final_answer(text, f),
        (None, None) => ParsedAction::ParseFailure {
            raw: text.trim().to_string(),
            reason: format!("Invalid Format: Missing '{ACTION}' or '{FINAL_ANSWER}' after '{THOUGHT}'"),
        },
    }
}

/// Find `marker` only where it starts a word (`Reaction:` is not an action).
fn find_marker(text: &str, marker: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(offset) = text[from..].find(marker) {
        let at = from + offset;
        let preceded_ok = text[..at]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace());
        if preceded_ok {
            return Some(at);
        }
        from = at + marker.len();
    }
    None
}

fn truncate_at_observation(text: &str) -> &str {
    text.match_indices(OBSERVATION)
        .find(|(at, _)| *at == 0 || text[..*at].ends_with('\n'))
        .map_or(text, |(at, _)| &text[..at])
}

fn thought_before(text: &str, end: usize) -> String {
    let head = text[..end].trim();
    head.strip_prefix(THOUGHT).unwrap_or(head).trim().to_string()
}

fn final_answer(text: &str, at: usize) -> ParsedAction {
    let answer = text[at + FINAL_ANSWER.len()..].trim();
    if answer.is_empty() {
        return ParsedAction::ParseFailure {
            raw: text.trim().to_string(),
            reason: format!("Invalid Format: '{FINAL_ANSWER}' is empty"),
        };
    }
    ParsedAction::FinalAnswer {
        thought: thought_before(text, at),
        text: answer.to_string(),
    }
}

fn tool_call(text: &str, at: usize) -> ParsedAction {
    let after_action = &text[at + ACTION.len()..];

    let Some(input_at) = after_action.find(ACTION_INPUT) else {
        return ParsedAction::ParseFailure {
            raw: text.trim().to_string(),
            reason: format!("Invalid Format: Missing '{ACTION_INPUT}' after '{ACTION}'"),
        };
    };

    let name = clean_tool_name(&after_action[..input_at]);
    if name.is_empty() {
        return ParsedAction::ParseFailure {
            raw: text.trim().to_string(),
            reason: format!("Invalid Format: '{ACTION}' names no tool"),
        };
    }

    let mut input = &after_action[input_at + ACTION_INPUT.len()..];
    // A trailing final answer in the same continuation belongs to no tool
    if let Some(end) = input.find(FINAL_ANSWER) {
        input = &input[..end];
    }

    ParsedAction::ToolCall {
        thought: thought_before(text, at),
        name,
        input: strip_quotes(input.trim()).to_string(),
    }
}

fn clean_tool_name(raw: &str) -> String {
    raw.lines()
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '`' || c == '*' || c == '[' || c == ']')
        .trim()
        .to_string()
}

fn strip_quotes(input: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if input.len() >= 2 && input.starts_with(quote) && input.ends_with(quote) {
            return &input[1..input.len() - 1];
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_call() {
        let parsed = parse_continuation(
            " I need to calculate this.\nAction: MathTool\nAction Input: 3 + 4\n",
        );
        assert_eq!(
            parsed,
            ParsedAction::ToolCall {
                thought: "I need to calculate this.".into(),
                name: "MathTool".into(),
                input: "3 + 4".into(),
            }
        );
    }

    #[test]
    fn test_parse_final_answer() {
        let parsed = parse_continuation("Thought: I now know the final answer\nFinal Answer: Gravity is a force.");
        assert_eq!(
            parsed,
            ParsedAction::FinalAnswer {
                thought: "I now know the final answer".into(),
                text: "Gravity is a force.".into(),
            }
        );
    }

    #[test]
    fn test_hallucinated_observation_is_dropped() {
        let parsed = parse_continuation(
            "Action: MathTool\nAction Input: \"2*3\"\nObservation: 6\nThought: done\nFinal Answer: 6",
        );
        assert_eq!(
            parsed,
            ParsedAction::ToolCall {
                thought: String::new(),
                name: "MathTool".into(),
                input: "2*3".into(),
            }
        );
    }

    #[test]
    fn test_earlier_final_answer_wins() {
        let parsed = parse_continuation("Final Answer: 42\nAction: MathTool\nAction Input: 6*7");
        assert!(matches!(parsed, ParsedAction::FinalAnswer { ref text, .. } if text.starts_with("42")));
    }

    #[test]
    fn test_unparseable_text() {
        let parsed = parse_continuation("I am not sure what to do here.");
        assert!(matches!(parsed, ParsedAction::ParseFailure { ref raw, .. } if raw == "I am not sure what to do here."));
    }

    #[test]
    fn test_action_without_input_is_failure() {
        let parsed = parse_continuation("Action: MathTool");
        assert!(matches!(parsed, ParsedAction::ParseFailure { ref reason, .. } if reason.contains("Action Input")));
    }

    #[test]
    fn test_empty_final_answer_is_failure() {
        assert!(matches!(parse_continuation("Final Answer:   "), ParsedAction::ParseFailure { .. }));
    }

    #[test]
    fn test_tool_name_decorations_stripped() {
        let parsed = parse_continuation("Action: `RAGSearch`\nAction Input: 'refund policy'");
        assert_eq!(
            parsed,
            ParsedAction::ToolCall {
                thought: String::new(),
                name: "RAGSearch".into(),
                input: "refund policy".into(),
            }
        );
    }

    #[test]
    fn test_inline_observation_word_kept() {
        let parsed = parse_continuation("Final Answer: the Observation: deck is open");
        assert!(matches!(parsed, ParsedAction::FinalAnswer { ref text, .. } if text == "the Observation: deck is open"));
    }
}
