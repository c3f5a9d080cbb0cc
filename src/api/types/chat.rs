//! RAG chat request and response types

use serde::{Deserialize, Serialize};

use crate::domain::llm::{Message, MessageRole, Usage};

/// Role of a chat message on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageRole {
    System,
    User,
    Assistant,
}

impl From<ChatMessageRole> for MessageRole {
    fn from(role: ChatMessageRole) -> Self {
        match role {
            ChatMessageRole::System => Self::System,
            ChatMessageRole::User => Self::User,
            ChatMessageRole::Assistant => Self::Assistant,
        }
    }
}

/// A chat message on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatMessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn to_domain(&self) -> Message {
        Message::new(self.role.into(), self.content.clone())
    }
}

/// Request body for `/rag/query` and `/rag/stream`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagQueryRequest {
    /// Full conversation; the last message is the query
    pub messages: Vec<ChatMessage>,
}

impl RagQueryRequest {
    /// Split into the query text and the preceding conversation history
    pub fn split_query(&self) -> Option<(String, Vec<Message>)> {
        let (last, history) = self.messages.split_last()?;

        let history = history.iter().map(|m| m.to_domain()).collect();
        Some((last.content.clone(), history))
    }
}

/// Response body for `/rag/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagQueryResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl RagQueryResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialization() {
        let json = r#"{
            "messages": [
                {"role": "user", "content": "Hello"},
                {"role": "assistant", "content": "Hi!"},
                {"role": "user", "content": "What is the policy?"}
            ]
        }"#;

        let request: RagQueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, ChatMessageRole::User);
    }

    #[test]
    fn test_split_query() {
        let request = RagQueryRequest {
            messages: vec![
                ChatMessage {
                    role: ChatMessageRole::User,
                    content: "Hello".to_string(),
                },
                ChatMessage {
                    role: ChatMessageRole::Assistant,
                    content: "Hi!".to_string(),
                },
                ChatMessage {
                    role: ChatMessageRole::User,
                    content: "What is the policy?".to_string(),
                },
            ],
        };

        let (query, history) = request.split_query().unwrap();
        assert_eq!(query, "What is the policy?");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content(), "Hello");
        assert_eq!(history[1].role, MessageRole::Assistant);
    }

    #[test]
    fn test_split_query_empty() {
        let request = RagQueryRequest { messages: vec![] };
        assert!(request.split_query().is_none());
    }

    #[test]
    fn test_response_serialization() {
        let response = RagQueryResponse::new("The policy is 30 days.");
        let json = serde_json::to_string(&response).unwrap();

        assert_eq!(json, r#"{"response":"The policy is 30 days."}"#);
    }

    #[test]
    fn test_response_with_usage() {
        let response = RagQueryResponse::new("ok").with_usage(Usage::new(10, 5));
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"total_tokens\":15"));
    }
}
