//! OCR Engines
//!
//! Text extraction from images, behind a trait so the OCR tool can run
//! against a stub in tests.

mod tesseract;

pub use tesseract::TesseractEngine;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// OCR engine trait (Strategy pattern)
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Extract text from the image at `image`
    async fn extract_text(&self, image: &Path) -> Result<String>;

    /// Check if the engine is available
    async fn health_check(&self) -> bool {
        true
    }

    /// Engine name
    fn name(&self) -> &str;
}
