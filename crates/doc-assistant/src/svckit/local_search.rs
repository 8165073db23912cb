//! Local Search Tool
//!
//! Case-insensitive keyword search over the `.txt` and `.md` files of the
//! data directory. Unlike RAGSearch this needs no index and matches
//! literally.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use agent_core::{RequestContext, Result as CoreResult, Tool, ToolSchema};

use crate::error::{AssistantError, Result};

/// Returned for an empty query
pub const GUARD_MESSAGE: &str = "LocalSearch needs a keyword to search for.";

const DEFAULT_MAX_RESULTS: usize = 10;

pub struct LocalSearchTool {
    root: PathBuf,
    max_results: usize,
}

impl LocalSearchTool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Cap the number of returned matches; values below one are raised to one
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Searchable files under the root, sorted for stable output.
    /// Entries that cannot be read are skipped.
    async fn files(&self) -> Result<Vec<PathBuf>> {
        if !tokio::fs::metadata(&self.root).await?.is_dir() {
            return Err(AssistantError::Load {
                path: self.root.clone(),
                reason: "not a directory".into(),
            });
        }

        let root = self.root.clone();
        let mut files: Vec<PathBuf> = tokio::task::spawn_blocking(move || {
            WalkDir::new(&root)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|entry| entry.file_type().is_file() && is_searchable(entry.path()))
                .map(walkdir::DirEntry::into_path)
                .collect()
        })
        .await
        .map_err(|e| AssistantError::Load {
            path: self.root.clone(),
            reason: e.to_string(),
        })?;

        files.sort();
        Ok(files)
    }

    async fn search(&self, needle: &str) -> Result<Vec<String>> {
        let mut matches = Vec::new();

        for path in self.files().await? {
            // Files that are not valid UTF-8 are not searchable text.
            let Ok(content) = tokio::fs::read_to_string(&path).await else {
                continue;
            };
            let display = path.strip_prefix(&self.root).unwrap_or(&path).display().to_string();

            for (number, line) in content.lines().enumerate() {
                if line.to_lowercase().contains(needle) {
                    matches.push(format!("{display}:{}: {}", number + 1, line.trim()));
                    if matches.len() >= self.max_results {
                        return Ok(matches);
                    }
                }
            }
        }

        Ok(matches)
    }
}

fn is_searchable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt") || e.eq_ignore_ascii_case("md"))
}

#[async_trait]
impl Tool for LocalSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new("LocalSearch", "Local simple search utility. Input: a keyword or phrase.").with_category("search")
    }

    async fn invoke(&self, input: &str, _ctx: &RequestContext) -> CoreResult<String> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(GUARD_MESSAGE.to_string());
        }

        let matches = self.search(&needle).await?;
        if matches.is_empty() {
            return Ok(format!("No matches for '{}'.", input.trim()));
        }
        Ok(matches.join("\n"))
    }
}
