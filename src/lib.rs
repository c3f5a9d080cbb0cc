//! RAG Chat Gateway
//!
//! A chat service that answers questions grounded in an AWS Bedrock
//! knowledge base:
//! - Retrieval over the Bedrock agent runtime (managed knowledge bases)
//! - Generation over the Bedrock runtime (Anthropic messages format)
//! - Plain JSON and word-streamed chat endpoints plus a static web UI

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::rag::{RagOptions, RagPipeline};
use infrastructure::llm::{BedrockClient, BedrockProvider};
use infrastructure::retrieval::{BedrockAgentClient, BedrockKnowledgeBase};

/// Create the application state from configuration
pub async fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let aws_config = load_aws_config(&config).await;

    let llm = Arc::new(BedrockProvider::new(BedrockClient::new(&aws_config)));
    let retriever = Arc::new(BedrockKnowledgeBase::new(
        &config.bedrock.knowledge_base_id,
        BedrockAgentClient::new(&aws_config),
    ));

    info!(
        model_id = %config.bedrock.model_id,
        knowledge_base_id = %config.bedrock.knowledge_base_id,
        "Bedrock clients initialized"
    );

    let options = RagOptions {
        top_k: config.rag.top_k,
        score_threshold: config.rag.score_threshold,
        max_tokens: config.rag.max_tokens,
        temperature: config.rag.temperature,
        system_prompt: config.rag.system_prompt.clone(),
    };

    let pipeline = Arc::new(RagPipeline::new(
        retriever.clone(),
        llm,
        config.bedrock.model_id.clone(),
        options,
    ));

    Ok(AppState::new(pipeline, retriever, Arc::new(config)))
}

async fn load_aws_config(config: &AppConfig) -> aws_config::SdkConfig {
    let defaults = aws_config::defaults(aws_config::BehaviorVersion::latest());

    match &config.bedrock.region {
        Some(region) => {
            defaults
                .region(aws_config::Region::new(region.clone()))
                .load()
                .await
        }
        None => defaults.load().await,
    }
}
