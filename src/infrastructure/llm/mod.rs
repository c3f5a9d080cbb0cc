//! Model provider implementations

mod bedrock;

pub use bedrock::{BedrockClient, BedrockProvider, BedrockRuntimeClient};
