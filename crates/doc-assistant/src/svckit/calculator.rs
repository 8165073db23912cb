//! Math Tool
//!
//! Restricted arithmetic evaluator. Input is first checked against the
//! character set `0-9 + - * / ( ) .` and whitespace; anything else is
//! refused before parsing. Accepted input is parsed by recursive descent:
//!
//! ```text
//! expr   := term   (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | number | '(' expr ')'
//! ```
//!
//! There are no identifiers, functions or exponentiation.

use async_trait::async_trait;

use agent_core::{RequestContext, Result as CoreResult, Tool, ToolSchema};

/// Returned when the input contains anything but arithmetic characters
pub const GUARD_MESSAGE: &str = "MathTool can only calculate numeric math expressions.";
/// Returned when arithmetic characters do not form a valid expression
pub const INVALID_MESSAGE: &str = "Invalid math expression.";

// Deep nesting like "((((((...1" is refused rather than recursed into.
const MAX_DEPTH: usize = 64;

/// Evaluate `expr`, returning the result or a guard/invalid message as text
pub fn evaluate(expr: &str) -> String {
    if expr.trim().is_empty() || !expr.chars().all(is_allowed) {
        return GUARD_MESSAGE.to_string();
    }

    let mut parser = Parser {
        chars: expr.chars().filter(|c| !c.is_whitespace()).collect(),
        pos: 0,
        depth: 0,
    };

    match parser.parse() {
        Some(value) if value.is_finite() => format_number(value),
        _ => INVALID_MESSAGE.to_string(),
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || "+-*/().".contains(c) || c.is_whitespace()
}

#[allow(clippy::cast_possible_truncation)]
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn parse(&mut self) -> Option<f64> {
        let value = self.expr()?;
        (self.pos == self.chars.len()).then_some(value)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            if self.eat('+') {
                value += self.term()?;
            } else if self.eat('-') {
                value -= self.term()?;
            } else {
                return Some(value);
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        loop {
            if self.eat('*') {
                value *= self.factor()?;
            } else if self.eat('/') {
                let divisor = self.factor()?;
                if divisor == 0.0 {
                    return None;
                }
                value /= divisor;
            } else {
                return Some(value);
            }
        }
    }

    fn factor(&mut self) -> Option<f64> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return None;
        }

        let value = if self.eat('+') {
            self.factor()
        } else if self.eat('-') {
            self.factor().map(|v| -v)
        } else if self.eat('(') {
            let inner = self.expr()?;
            self.eat(')').then_some(inner)
        } else {
            self.number()
        };

        self.depth -= 1;
        value
    }

    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        if !literal.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        literal.parse().ok()
    }
}

/// Tool wrapper around [`evaluate`]
pub struct MathTool;

#[async_trait]
impl Tool for MathTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new("MathTool", "Evaluate ONLY numeric math expressions.").with_category("math")
    }

    async fn invoke(&self, input: &str, _ctx: &RequestContext) -> CoreResult<String> {
        Ok(evaluate(input))
    }
}
