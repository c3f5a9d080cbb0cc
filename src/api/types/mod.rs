//! API request/response types

mod chat;
mod error;

pub use chat::{ChatMessage, ChatMessageRole, RagQueryRequest, RagQueryResponse};
pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
