//! AWS Bedrock model provider implementation

use async_trait::async_trait;
use futures::stream;
use serde::Deserialize;

use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, LlmStream, Message,
    MessageRole, StreamChunk, Usage,
};

/// AWS Bedrock runtime client trait for dependency injection
#[async_trait]
pub trait BedrockRuntimeClient: Send + Sync + std::fmt::Debug {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, DomainError>;
}

/// AWS Bedrock provider speaking the Anthropic messages format
#[derive(Debug)]
pub struct BedrockProvider<C: BedrockRuntimeClient> {
    client: C,
}

impl<C: BedrockRuntimeClient> BedrockProvider<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    fn build_request_body(&self, request: &LlmRequest) -> serde_json::Value {
        let (system, messages) = split_system_messages(&request.messages);

        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        MessageRole::Assistant => "assistant",
                        _ => "user",
                    },
                    "content": m.content(),
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "anthropic_version": "bedrock-2023-05-31",
            "messages": api_messages,
            "max_tokens": request.max_tokens.unwrap_or(1024),
        });

        if let Some(system_content) = system {
            body["system"] = serde_json::json!(system_content);
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(top_p) = request.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }

        if let Some(ref stop) = request.stop {
            body["stop_sequences"] = serde_json::json!(stop);
        }

        body
    }

    fn parse_response(&self, model: &str, bytes: &[u8]) -> Result<LlmResponse, DomainError> {
        let response: InvokeModelResponse = serde_json::from_slice(bytes).map_err(|e| {
            DomainError::provider("bedrock", format!("Failed to parse response: {}", e))
        })?;

        let content = response
            .content
            .into_iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let message = Message::assistant(content);
        let id = format!("bedrock-{}", uuid::Uuid::new_v4());

        let mut llm_response = LlmResponse::new(id, model.to_string(), message)
            .with_finish_reason(parse_stop_reason(&response.stop_reason));

        if let Some(usage) = response.usage {
            llm_response =
                llm_response.with_usage(Usage::new(usage.input_tokens, usage.output_tokens));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: BedrockRuntimeClient> LlmProvider for BedrockProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let body = self.build_request_body(&request);

        let body_bytes = serde_json::to_vec(&body).map_err(|e| {
            DomainError::provider("bedrock", format!("Failed to serialize request: {}", e))
        })?;

        let response_bytes = self.client.invoke_model(model, body_bytes).await?;

        self.parse_response(model, &response_bytes)
    }

    async fn chat_stream(
        &self,
        model: &str,
        request: LlmRequest,
    ) -> Result<LlmStream, DomainError> {
        // Chunked playback of the completed answer. The response-stream
        // invoke API is not used; consumers pace the chunks themselves.
        let response = self.chat(model, request).await?;
        let content = response.content().to_string();

        let chunks: Vec<Result<StreamChunk, DomainError>> = content
            .split_whitespace()
            .map(|word| {
                Ok(StreamChunk::new(response.id.clone(), response.model.clone())
                    .with_delta(format!("{} ", word)))
            })
            .chain(std::iter::once(Ok(StreamChunk::new(
                response.id.clone(),
                response.model.clone(),
            )
            .with_finish_reason(
                response.finish_reason.unwrap_or(FinishReason::Stop),
            ))))
            .collect();

        Ok(Box::pin(stream::iter(chunks)))
    }

    fn provider_name(&self) -> &'static str {
        "bedrock"
    }
}

fn split_system_messages(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
    let mut system_content = String::new();
    let mut other_messages = Vec::new();

    for msg in messages {
        if msg.role == MessageRole::System {
            if !system_content.is_empty() {
                system_content.push('\n');
            }
            system_content.push_str(msg.content());
        } else {
            other_messages.push(msg);
        }
    }

    let system = if system_content.is_empty() {
        None
    } else {
        Some(system_content)
    };

    (system, other_messages)
}

fn parse_stop_reason(reason: &Option<String>) -> FinishReason {
    match reason.as_deref() {
        Some("max_tokens") => FinishReason::Length,
        _ => FinishReason::Stop,
    }
}

// Bedrock API types

#[derive(Debug, Deserialize)]
struct InvokeModelResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Real AWS Bedrock runtime client
#[derive(Debug, Clone)]
pub struct BedrockClient {
    client: aws_sdk_bedrockruntime::Client,
}

impl BedrockClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        let client = aws_sdk_bedrockruntime::Client::new(config);
        Self { client }
    }
}

#[async_trait]
impl BedrockRuntimeClient for BedrockClient {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, DomainError> {
        let blob = aws_sdk_bedrockruntime::primitives::Blob::new(body);

        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .body(blob)
            .content_type("application/json")
            .accept("application/json")
            .send()
            .await
            .map_err(|e| DomainError::provider("bedrock", format!("API error: {}", e)))?;

        Ok(response.body.into_inner())
    }
}
