//! Infrastructure layer - AWS clients and process-level concerns

pub mod llm;
pub mod logging;
pub mod retrieval;
