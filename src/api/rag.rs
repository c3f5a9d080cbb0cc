//! RAG query and streaming endpoint handlers

use std::convert::Infallible;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::Response,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use futures::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info};
use uuid::Uuid;

use super::state::AppState;
use super::types::{ApiError, RagQueryRequest, RagQueryResponse};
use crate::domain::llm::Message;

/// Create the `/rag` router
pub fn create_rag_router() -> Router<AppState> {
    Router::new()
        .route("/query", post(rag_query))
        .route("/stream", post(rag_stream))
}

/// POST /rag/query
pub async fn rag_query(
    State(state): State<AppState>,
    Json(request): Json<RagQueryRequest>,
) -> Result<Json<RagQueryResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let (query, history) = split_query(&request)?;

    info!(
        request_id = %request_id,
        history_len = history.len(),
        "Processing RAG query"
    );

    let start = Instant::now();
    let answer = state.pipeline.answer(&query, &history).await?;

    info!(
        request_id = %request_id,
        passages = answer.passages.len(),
        duration_ms = %start.elapsed().as_millis(),
        "RAG query completed"
    );

    let mut response = RagQueryResponse::new(answer.text);

    if let Some(usage) = answer.usage {
        response = response.with_usage(usage);
    }

    Ok(Json(response))
}

/// POST /rag/stream
///
/// Streams the answer as plain text, one whitespace-delimited chunk at a
/// time. The pipeline runs to completion before the stream opens, so
/// failures surface as ordinary JSON error responses.
pub async fn rag_stream(
    State(state): State<AppState>,
    Json(request): Json<RagQueryRequest>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let (query, history) = split_query(&request)?;

    info!(
        request_id = %request_id,
        history_len = history.len(),
        "Processing streaming RAG query"
    );

    let (mut stream, passages) = state.pipeline.answer_stream(&query, &history).await?;

    info!(
        request_id = %request_id,
        passages = passages.len(),
        "Streaming RAG answer"
    );

    let delay = Duration::from_millis(state.config.rag.stream_delay_ms);
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<Bytes, Infallible>>(32);

    tokio::spawn(async move {
        while let Some(chunk_result) = stream.next().await {
            match chunk_result {
                Ok(chunk) => {
                    if let Some(delta) = chunk.delta {
                        if tx.send(Ok(Bytes::from(delta))).await.is_err() {
                            // Client went away
                            break;
                        }

                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                    }
                }
                Err(e) => {
                    error!(request_id = %request_id, error = %e, "Stream error");
                    break;
                }
            }
        }
    });

    let body = Body::from_stream(ReceiverStream::new(rx));

    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(body)
        .map_err(|e| ApiError::internal(e.to_string()))
}

/// Split the conversation into query and history, validating the request
fn split_query(request: &RagQueryRequest) -> Result<(String, Vec<Message>), ApiError> {
    request
        .split_query()
        .ok_or_else(|| ApiError::bad_request("Messages cannot be empty").with_param("messages"))
}
