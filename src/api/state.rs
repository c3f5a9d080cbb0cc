//! Application state for shared services

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::rag::RagPipeline;
use crate::domain::retrieval::PassageRetriever;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
    pub retriever: Arc<dyn PassageRetriever>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<RagPipeline>,
        retriever: Arc<dyn PassageRetriever>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            pipeline,
            retriever,
            config,
        }
    }
}
