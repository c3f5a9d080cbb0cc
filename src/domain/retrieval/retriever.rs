use std::fmt::Debug;

use async_trait::async_trait;

use super::Passage;
use crate::domain::DomainError;

/// Parameters for a knowledge base retrieval
#[derive(Debug, Clone)]
pub struct RetrievalParams {
    /// Query text to search for
    pub query: String,
    /// Number of passages to return
    pub top_k: u32,
    /// Minimum similarity score (0.0 - 1.0); passages below are dropped
    pub score_threshold: f32,
}

impl RetrievalParams {
    /// Create new retrieval parameters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: 3,
            score_threshold: 0.0,
        }
    }

    /// Set number of passages
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set score threshold
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }
}

/// Provider trait for knowledge base retrieval
///
/// Implementations translate between this interface and a managed retrieval
/// backend. Only read operations are offered: index management belongs to
/// the backend, not this service.
#[async_trait]
pub trait PassageRetriever: Send + Sync + Debug {
    /// Get the retriever backend type name
    fn retriever_type(&self) -> &'static str;

    /// Retrieve passages matching the query
    async fn retrieve(&self, params: RetrievalParams) -> Result<Vec<Passage>, DomainError>;

    /// Check whether the backend is reachable
    async fn health_check(&self) -> Result<bool, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock retriever for testing
    #[derive(Debug, Default)]
    pub struct MockPassageRetriever {
        passages: Mutex<Vec<Passage>>,
        retrieve_count: AtomicUsize,
        error: Option<String>,
    }

    impl MockPassageRetriever {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_passages(self, passages: Vec<Passage>) -> Self {
            *self.passages.lock().unwrap() = passages;
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Get the number of retrieve calls
        pub fn retrieve_count(&self) -> usize {
            self.retrieve_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PassageRetriever for MockPassageRetriever {
        fn retriever_type(&self) -> &'static str {
            "mock"
        }

        async fn retrieve(&self, params: RetrievalParams) -> Result<Vec<Passage>, DomainError> {
            self.retrieve_count.fetch_add(1, Ordering::SeqCst);

            if let Some(ref error) = self.error {
                return Err(DomainError::knowledge_base(error.clone()));
            }

            let passages = self.passages.lock().unwrap();
            Ok(passages
                .iter()
                .filter(|p| p.score >= params.score_threshold)
                .take(params.top_k as usize)
                .cloned()
                .collect())
        }

        async fn health_check(&self) -> Result<bool, DomainError> {
            Ok(self.error.is_none())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_retriever_top_k() {
            let retriever = MockPassageRetriever::new().with_passages(vec![
                Passage::new("p1", "first", 0.9),
                Passage::new("p2", "second", 0.8),
                Passage::new("p3", "third", 0.7),
            ]);

            let passages = retriever
                .retrieve(RetrievalParams::new("query").with_top_k(2))
                .await
                .unwrap();

            assert_eq!(passages.len(), 2);
            assert_eq!(retriever.retrieve_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_retriever_threshold() {
            let retriever = MockPassageRetriever::new().with_passages(vec![
                Passage::new("p1", "first", 0.9),
                Passage::new("p2", "second", 0.2),
            ]);

            let passages = retriever
                .retrieve(RetrievalParams::new("query").with_score_threshold(0.5))
                .await
                .unwrap();

            assert_eq!(passages.len(), 1);
            assert_eq!(passages[0].id, "p1");
        }

        #[tokio::test]
        async fn test_mock_retriever_error() {
            let retriever = MockPassageRetriever::new().with_error("unavailable");

            let result = retriever.retrieve(RetrievalParams::new("query")).await;
            assert!(result.is_err());
            assert!(!retriever.health_check().await.unwrap());
        }
    }
}
