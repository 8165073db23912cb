//! Application State

use std::path::PathBuf;
use std::sync::Arc;

use agent_core::{Agent, EmbeddingProvider, LlmProvider, ToolRegistry};
use doc_assistant::{
    OcrEngine, Retriever, TesseractEngine, VectorIndex,
    tools::{LocalSearchTool, MathTool, OcrTool, RagSearchTool, ScheduleTool},
};
use tokio::sync::Semaphore;

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Reasoning loop; stateless apart from per-run scratchpads
    pub agent: Arc<Agent>,

    /// Vector index behind RAGSearch
    pub index: Arc<VectorIndex>,

    /// Bounds concurrent agent runs
    pub limiter: Arc<Semaphore>,

    /// Where uploaded images are saved for the duration of a request
    pub upload_dir: PathBuf,
}

impl AppState {
    /// Wire the agent, tools and index together.
    ///
    /// Fails if the index on disk was built with a different embedding model.
    pub fn build(
        config: &AppConfig,
        provider: Arc<dyn LlmProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        ocr: Arc<dyn OcrEngine>,
    ) -> anyhow::Result<Self> {
        let index = Arc::new(VectorIndex::open(
            &config.index_dir,
            embedder.model_name(),
            embedder.dimensions(),
        )?);
        let retriever = Retriever::new(index.clone(), embedder)?.with_max_distance(config.rag_max_distance);

        let mut tools = ToolRegistry::new().with_timeout(config.tool_timeout);
        tools.register(RagSearchTool::new(Arc::new(retriever)).with_top_k(config.rag_top_k));
        tools.register(MathTool);
        tools.register(OcrTool::new(ocr));
        tools.register(ScheduleTool::new(&config.schedule_file));
        tools.register(LocalSearchTool::new(&config.data_dir));

        tracing::info!("Registered {} tools:", tools.len());
        for name in tools.names() {
            tracing::info!("  • {}", name);
        }

        std::fs::create_dir_all(&config.upload_dir)?;

        Ok(Self {
            agent: Arc::new(Agent::new(provider, Arc::new(tools), config.agent_config())),
            index,
            limiter: Arc::new(Semaphore::new(config.max_concurrent_requests)),
            upload_dir: config.upload_dir.clone(),
        })
    }

    /// Default OCR engine
    pub fn tesseract() -> Arc<dyn OcrEngine> {
        Arc::new(TesseractEngine::new())
    }
}
