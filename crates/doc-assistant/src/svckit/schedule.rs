//! Schedule Tool
//!
//! Looks up events in a JSON schedule file:
//!
//! ```json
//! [{"date": "2026-10-18", "time": "09:30", "title": "Standup", "location": "Room 4"}]
//! ```
//!
//! Input is a date (`YYYY-MM-DD`), `today`, `tomorrow`, or empty /
//! `upcoming` for the next seven days. The file is re-read on every call
//! so edits show up without a restart.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use agent_core::{RequestContext, Result as CoreResult, Tool, ToolSchema};

use crate::error::{AssistantError, Result};

/// Returned for input that is not a recognised date query
pub const GUARD_MESSAGE: &str =
    "ScheduleTool accepts a date (YYYY-MM-DD), 'today', 'tomorrow' or 'upcoming'.";

const UPCOMING_DAYS: u64 = 7;

/// A scheduled event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: NaiveDate,
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Which days a query covers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DateQuery {
    Day(NaiveDate),
    Range { from: NaiveDate, to: NaiveDate },
}

impl DateQuery {
    fn parse(input: &str, today: NaiveDate) -> Option<Self> {
        let input = input.trim().trim_end_matches('.').to_ascii_lowercase();
        match input.as_str() {
            "" | "upcoming" | "week" | "this week" => Some(Self::Range {
                from: today,
                to: today.checked_add_days(Days::new(UPCOMING_DAYS - 1))?,
            }),
            "today" => Some(Self::Day(today)),
            "tomorrow" => today.checked_add_days(Days::new(1)).map(Self::Day),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d").ok().map(Self::Day),
        }
    }

    fn contains(self, date: NaiveDate) -> bool {
        match self {
            Self::Day(day) => date == day,
            Self::Range { from, to } => (from..=to).contains(&date),
        }
    }

    fn label(self) -> String {
        match self {
            Self::Day(day) => day.to_string(),
            Self::Range { from, to } => format!("{from} to {to}"),
        }
    }
}

pub struct ScheduleTool {
    path: PathBuf,
    today: Option<NaiveDate>,
}

impl ScheduleTool {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            today: None,
        }
    }

    /// Fix the current date instead of reading the local clock
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    async fn load_events(&self) -> Result<Vec<Event>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AssistantError::Schedule(format!("cannot read {}: {e}", self.path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| AssistantError::Schedule(format!("invalid schedule file {}: {e}", self.path.display())))
    }
}

#[async_trait]
impl Tool for ScheduleTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "ScheduleTool",
            "Get the user's schedule. Input: a date (YYYY-MM-DD), 'today', 'tomorrow' or 'upcoming'.",
        )
        .with_category("calendar")
    }

    async fn invoke(&self, input: &str, _ctx: &RequestContext) -> CoreResult<String> {
        let Some(query) = DateQuery::parse(input, self.today()) else {
            return Ok(GUARD_MESSAGE.to_string());
        };

        let mut events: Vec<Event> = self
            .load_events()
            .await?
            .into_iter()
            .filter(|e| query.contains(e.date))
            .collect();
        events.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));

        if events.is_empty() {
            return Ok(format!("No events scheduled for {}.", query.label()));
        }

        Ok(events
            .iter()
            .map(|e| match &e.location {
                Some(location) => format!("{} {} {} ({location})", e.date, e.time, e.title),
                None => format!("{} {} {}", e.date, e.time, e.title),
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
