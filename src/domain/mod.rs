//! Domain layer - core types, traits and the RAG pipeline

pub mod error;
pub mod llm;
pub mod rag;
pub mod retrieval;

pub use error::DomainError;
pub use llm::{FinishReason, LlmProvider, LlmRequest, LlmResponse, LlmStream, Message, MessageRole, StreamChunk, Usage};
pub use rag::{RagAnswer, RagOptions, RagPipeline};
pub use retrieval::{Passage, PassageRetriever, RetrievalParams};
