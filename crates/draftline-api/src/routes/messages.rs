use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use draftline::{Case, Delta, Message, NewMessage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_ref: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub message: Message,
    pub delta: Delta,
    pub draft: Value,
    /// False when the producer failed and the draft was left unchanged
    pub recorded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<Case>,
}

#[derive(Debug, Serialize)]
pub struct ListMessagesResponse {
    pub thread_id: String,
    pub messages: Vec<Message>,
}

/// Append a message and advance the thread's draft
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Json(req): Json<PostMessageRequest>,
) -> ApiResult<(StatusCode, Json<PostMessageResponse>)> {
    let posted = state
        .engine
        .post_message(
            &thread_id,
            NewMessage {
                author: req.author,
                text: req.text,
                image_ref: req.image_ref,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PostMessageResponse {
            message: posted.message,
            delta: posted.applied.delta,
            draft: posted.applied.doc,
            recorded: posted.applied.recorded,
            case: posted.case,
        }),
    ))
}

/// Message history of a thread, oldest first
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<ListMessagesResponse>> {
    let messages = state.engine.list_messages(&thread_id).await?;
    Ok(Json(ListMessagesResponse {
        thread_id,
        messages,
    }))
}
