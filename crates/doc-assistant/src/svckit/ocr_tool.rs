//! OCR Tool
//!
//! Extracts text from the image uploaded with the current request.
//!
//! The image location comes only from [`RequestContext::attachment`]. The
//! tool input written by the model is ignored, so the model can never
//! steer the tool at an arbitrary file.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{AgentError, RequestContext, Result as CoreResult, Tool, ToolSchema};

use crate::ocr::OcrEngine;

/// Returned when OCR succeeds but finds no text
pub const NO_TEXT: &str = "No text found in the image.";

pub struct OcrTool {
    engine: Arc<dyn OcrEngine>,
}

impl OcrTool {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for OcrTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new("OCRTool", "Extract text from the image uploaded with the question.").with_category("vision")
    }

    async fn invoke(&self, _input: &str, ctx: &RequestContext) -> CoreResult<String> {
        let image = ctx
            .attachment
            .as_deref()
            .ok_or_else(|| AgentError::ToolValidation("No image was uploaded with this question".into()))?;

        tracing::debug!(request_id = %ctx.request_id, engine = self.engine.name(), "Running OCR");
        let text = self.engine.extract_text(image).await?;
        let text = text.trim();

        Ok(if text.is_empty() { NO_TEXT.to_string() } else { text.to_string() })
    }
}
