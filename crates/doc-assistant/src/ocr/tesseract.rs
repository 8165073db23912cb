//! Tesseract OCR Engine
//!
//! Runs the `tesseract` binary as a child process and reads text from stdout.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::OcrEngine;
use crate::error::{AssistantError, Result};

pub struct TesseractEngine {
    binary: PathBuf,
    language: Option<String>,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: None,
        }
    }

    /// Use a specific binary path
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Tesseract language code, e.g. `eng` or `deu+eng`
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn command(&self, image: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(image).arg("stdout");
        if let Some(lang) = &self.language {
            cmd.arg("-l").arg(lang);
        }
        cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn extract_text(&self, image: &Path) -> Result<String> {
        if !tokio::fs::try_exists(image).await? {
            return Err(AssistantError::Ocr(format!("image not found: {}", image.display())));
        }

        let output = self
            .command(image)
            .output()
            .await
            .map_err(|e| AssistantError::Ocr(format!("failed to run {}: {e}", self.binary.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AssistantError::Ocr(format!(
                "could not read image ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn health_check(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|status| status.success())
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
