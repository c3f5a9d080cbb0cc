//! AWS Bedrock Knowledge Base retriever implementation

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use aws_smithy_types::Document as SmithyDocument;
use tracing::debug;

use crate::domain::retrieval::{Passage, PassageRetriever, RetrievalParams};
use crate::domain::DomainError;

/// A raw retrieval hit as returned by the backend
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub content: String,
    pub score: f32,
    pub source: Option<String>,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Knowledge base runtime client trait for dependency injection
#[async_trait]
pub trait KnowledgeBaseClient: Send + Sync + Debug {
    async fn retrieve(
        &self,
        knowledge_base_id: &str,
        query: &str,
        top_k: i32,
    ) -> Result<Vec<RetrievedChunk>, DomainError>;
}

/// Retriever backed by an AWS Bedrock Knowledge Base
///
/// The knowledge base itself is managed through the Bedrock console and S3
/// data source sync; this retriever only reads from it.
#[derive(Debug)]
pub struct BedrockKnowledgeBase<C: KnowledgeBaseClient> {
    knowledge_base_id: String,
    client: C,
}

impl<C: KnowledgeBaseClient> BedrockKnowledgeBase<C> {
    pub fn new(knowledge_base_id: impl Into<String>, client: C) -> Self {
        Self {
            knowledge_base_id: knowledge_base_id.into(),
            client,
        }
    }

    pub fn knowledge_base_id(&self) -> &str {
        &self.knowledge_base_id
    }
}

#[async_trait]
impl<C: KnowledgeBaseClient> PassageRetriever for BedrockKnowledgeBase<C> {
    fn retriever_type(&self) -> &'static str {
        "aws_knowledge_base"
    }

    async fn retrieve(&self, params: RetrievalParams) -> Result<Vec<Passage>, DomainError> {
        let chunks = self
            .client
            .retrieve(&self.knowledge_base_id, &params.query, params.top_k as i32)
            .await?;

        debug!(
            knowledge_base_id = %self.knowledge_base_id,
            hits = chunks.len(),
            "Knowledge base retrieval completed"
        );

        let passages = chunks
            .into_iter()
            .enumerate()
            .filter(|(_, chunk)| chunk.score >= params.score_threshold)
            .map(|(i, chunk)| {
                let id = chunk
                    .source
                    .clone()
                    .unwrap_or_else(|| format!("result-{}", i + 1));

                let mut passage = Passage::new(id, chunk.content, chunk.score)
                    .with_all_metadata(chunk.metadata);

                if let Some(source) = chunk.source {
                    passage = passage.with_source(source);
                }

                passage
            })
            .collect();

        Ok(passages)
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        // Minimal retrieval to verify connectivity
        match self
            .client
            .retrieve(&self.knowledge_base_id, "health check", 1)
            .await
        {
            Ok(_) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}

/// Real AWS Bedrock agent runtime client
#[derive(Debug, Clone)]
pub struct BedrockAgentClient {
    client: aws_sdk_bedrockagentruntime::Client,
}

impl BedrockAgentClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        let client = aws_sdk_bedrockagentruntime::Client::new(config);
        Self { client }
    }
}

#[async_trait]
impl KnowledgeBaseClient for BedrockAgentClient {
    async fn retrieve(
        &self,
        knowledge_base_id: &str,
        query: &str,
        top_k: i32,
    ) -> Result<Vec<RetrievedChunk>, DomainError> {
        use aws_sdk_bedrockagentruntime::types::{
            KnowledgeBaseQuery, KnowledgeBaseRetrievalConfiguration,
            KnowledgeBaseVectorSearchConfiguration,
        };

        let vector_config = KnowledgeBaseVectorSearchConfiguration::builder()
            .number_of_results(top_k)
            .build();

        let retrieval_config = KnowledgeBaseRetrievalConfiguration::builder()
            .vector_search_configuration(vector_config)
            .build();

        let kb_query = KnowledgeBaseQuery::builder()
            .text(query)
            .build();

        let response = self
            .client
            .retrieve()
            .knowledge_base_id(knowledge_base_id)
            .retrieval_query(kb_query)
            .retrieval_configuration(retrieval_config)
            .send()
            .await
            .map_err(|e| {
                DomainError::knowledge_base(format!("Knowledge base retrieve failed: {}", e))
            })?;

        let mut chunks = Vec::new();

        for r in response.retrieval_results() {
            let content = match r.content() {
                Some(c) => c.text().to_string(),
                None => continue,
            };

            let score = r.score().unwrap_or(0.0) as f32;

            let source = r
                .location()
                .and_then(|l| l.s3_location())
                .and_then(|s3| s3.uri())
                .map(|uri| uri.to_string());

            let mut metadata = HashMap::new();

            if let Some(meta) = r.metadata() {
                for (key, doc) in meta {
                    if let Some(val) = doc_to_json(doc) {
                        metadata.insert(key.clone(), val);
                    }
                }
            }

            chunks.push(RetrievedChunk {
                content,
                score,
                source,
                metadata,
            });
        }

        Ok(chunks)
    }
}

/// Convert an AWS Smithy Document to serde_json::Value
fn doc_to_json(doc: &SmithyDocument) -> Option<serde_json::Value> {
    match doc {
        SmithyDocument::String(s) => Some(serde_json::Value::String(s.clone())),
        SmithyDocument::Number(n) => Some(serde_json::json!(n.to_f64_lossy())),
        SmithyDocument::Bool(b) => Some(serde_json::Value::Bool(*b)),
        SmithyDocument::Null => Some(serde_json::Value::Null),
        SmithyDocument::Array(arr) => {
            let values: Vec<serde_json::Value> = arr.iter().filter_map(doc_to_json).collect();
            Some(serde_json::Value::Array(values))
        }
        SmithyDocument::Object(obj) => {
            let mut map = serde_json::Map::new();

            for (k, v) in obj {
                if let Some(val) = doc_to_json(v) {
                    map.insert(k.clone(), val);
                }
            }

            Some(serde_json::Value::Object(map))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use mock::MockKnowledgeBaseClient;

    fn chunk(content: &str, score: f32, source: Option<&str>) -> RetrievedChunk {
        RetrievedChunk {
            content: content.to_string(),
            score,
            source: source.map(|s| s.to_string()),
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_retrieve_maps_chunks_to_passages() {
        let client = MockKnowledgeBaseClient::new().with_chunks(vec![
            chunk("First hit.", 0.9, Some("s3://docs/a.pdf")),
            chunk("Second hit.", 0.8, None),
        ]);
        let retriever = BedrockKnowledgeBase::new("kb-12345", client);

        let passages = retriever
            .retrieve(RetrievalParams::new("query").with_top_k(3))
            .await
            .unwrap();

        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].id, "s3://docs/a.pdf");
        assert_eq!(passages[0].source.as_deref(), Some("s3://docs/a.pdf"));
        assert_eq!(passages[1].id, "result-2");
        assert!(passages[1].source.is_none());
    }

    #[tokio::test]
    async fn test_retrieve_applies_score_threshold() {
        let client = MockKnowledgeBaseClient::new().with_chunks(vec![
            chunk("Relevant.", 0.9, None),
            chunk("Noise.", 0.1, None),
        ]);
        let retriever = BedrockKnowledgeBase::new("kb-12345", client);

        let passages = retriever
            .retrieve(RetrievalParams::new("query").with_score_threshold(0.5))
            .await
            .unwrap();

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].content, "Relevant.");
    }

    #[tokio::test]
    async fn test_health_check() {
        let healthy = BedrockKnowledgeBase::new("kb-1", MockKnowledgeBaseClient::new());
        assert!(healthy.health_check().await.unwrap());

        let unhealthy = BedrockKnowledgeBase::new(
            "kb-1",
            MockKnowledgeBaseClient::new().with_error("unreachable"),
        );
        assert!(!unhealthy.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_retrieve_propagates_error() {
        let client = MockKnowledgeBaseClient::new().with_error("access denied");
        let retriever = BedrockKnowledgeBase::new("kb-12345", client);

        let result = retriever.retrieve(RetrievalParams::new("query")).await;
        assert!(matches!(result, Err(DomainError::KnowledgeBase(_))));
    }

    #[test]
    fn test_doc_to_json() {
        let doc = SmithyDocument::String("value".to_string());
        assert_eq!(
            doc_to_json(&doc),
            Some(serde_json::Value::String("value".to_string()))
        );

        let doc = SmithyDocument::Bool(true);
        assert_eq!(doc_to_json(&doc), Some(serde_json::Value::Bool(true)));
    }
}
