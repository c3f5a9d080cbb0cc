//! Knowledge base retriever implementations

mod bedrock_kb;

pub use bedrock_kb::{
    BedrockAgentClient, BedrockKnowledgeBase, KnowledgeBaseClient, RetrievedChunk,
};
