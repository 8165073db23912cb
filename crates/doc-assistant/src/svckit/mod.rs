//! Service Kit - Agent Tools
//!
//! Tools that implement `agent_core::Tool` for the document assistant.

mod calculator;
mod local_search;
mod ocr_tool;
mod rag_search;
mod schedule;

pub use calculator::{MathTool, evaluate};
pub use local_search::LocalSearchTool;
pub use ocr_tool::OcrTool;
pub use rag_search::RagSearchTool;
pub use schedule::{Event, ScheduleTool};
