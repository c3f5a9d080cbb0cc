//! Retrieval-augmented generation pipeline

use std::sync::Arc;

use tracing::{debug, warn};

use super::prompt::{build_prompt, format_passages};
use crate::domain::llm::{LlmProvider, LlmRequest, LlmStream, Message, Usage};
use crate::domain::retrieval::{Passage, PassageRetriever, RetrievalParams};
use crate::domain::DomainError;

/// Tunable parameters for the pipeline
#[derive(Debug, Clone)]
pub struct RagOptions {
    /// Number of passages retrieved per query
    pub top_k: u32,
    /// Minimum similarity score for retrieved passages
    pub score_threshold: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Generation temperature
    pub temperature: f32,
    /// System prompt for the model
    pub system_prompt: String,
}

impl Default for RagOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            score_threshold: 0.0,
            max_tokens: 1024,
            temperature: 0.5,
            system_prompt: "You are a helpful assistant.".to_string(),
        }
    }
}

/// A generated answer together with the passages that grounded it
#[derive(Debug, Clone)]
pub struct RagAnswer {
    pub text: String,
    pub passages: Vec<Passage>,
    pub usage: Option<Usage>,
}

/// Orchestrates retrieval and generation for one conversation turn
#[derive(Debug)]
pub struct RagPipeline {
    retriever: Arc<dyn PassageRetriever>,
    llm: Arc<dyn LlmProvider>,
    model_id: String,
    options: RagOptions,
}

impl RagPipeline {
    pub fn new(
        retriever: Arc<dyn PassageRetriever>,
        llm: Arc<dyn LlmProvider>,
        model_id: impl Into<String>,
        options: RagOptions,
    ) -> Self {
        Self {
            retriever,
            llm,
            model_id: model_id.into(),
            options,
        }
    }

    pub fn options(&self) -> &RagOptions {
        &self.options
    }

    /// Answer a query grounded in retrieved passages
    pub async fn answer(
        &self,
        query: &str,
        history: &[Message],
    ) -> Result<RagAnswer, DomainError> {
        let (request, passages) = self.prepare(query, history).await?;
        let response = self.llm.chat(&self.model_id, request).await?;

        Ok(RagAnswer {
            text: response.content().to_string(),
            passages,
            usage: response.usage,
        })
    }

    /// Answer a query as a chunk stream
    pub async fn answer_stream(
        &self,
        query: &str,
        history: &[Message],
    ) -> Result<(LlmStream, Vec<Passage>), DomainError> {
        let (request, passages) = self.prepare(query, history).await?;
        let request = LlmRequest { stream: true, ..request };
        let stream = self.llm.chat_stream(&self.model_id, request).await?;

        Ok((stream, passages))
    }

    /// Retrieve passages and build the generation request
    async fn prepare(
        &self,
        query: &str,
        history: &[Message],
    ) -> Result<(LlmRequest, Vec<Passage>), DomainError> {
        let params = RetrievalParams::new(query)
            .with_top_k(self.options.top_k)
            .with_score_threshold(self.options.score_threshold);

        let passages = self.retriever.retrieve(params).await?;

        if passages.is_empty() {
            // Generation still runs; the model is told the context is empty.
            warn!(query_len = query.len(), "No passages retrieved for query");
        } else {
            debug!(
                count = passages.len(),
                top_score = passages.first().map(|p| f64::from(p.score)),
                "Retrieved passages"
            );
        }

        let context = format_passages(&passages);
        let prompt = build_prompt(&context, history, query);

        let request = LlmRequest::builder()
            .system(&self.options.system_prompt)
            .user(prompt)
            .temperature(self.options.temperature)
            .max_tokens(self.options.max_tokens)
            .build();

        Ok((request, passages))
    }
}
