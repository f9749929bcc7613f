use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use draftline::Thread;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadResponse {
    pub thread_id: String,
    pub thread: Thread,
}

#[derive(Debug, Deserialize)]
pub struct ListThreadsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct ListThreadsResponse {
    pub threads: Vec<Thread>,
    pub has_more: bool,
}

/// Create a new thread with an empty revision-0 draft
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateThreadRequest>>,
) -> ApiResult<(StatusCode, Json<CreateThreadResponse>)> {
    let Json(req) = body.unwrap_or_default();
    let thread = state.engine.create_thread(None, req.title).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateThreadResponse {
            thread_id: thread.id.clone(),
            thread,
        }),
    ))
}

/// List threads, newest first
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListThreadsQuery>,
) -> ApiResult<Json<ListThreadsResponse>> {
    let limit = query.limit.clamp(1, 100);
    let threads = state
        .engine
        .list_threads(Some(limit), Some(query.skip.max(0)))
        .await?;
    let has_more = threads.len() as i64 == limit;

    Ok(Json(ListThreadsResponse { threads, has_more }))
}

/// Get a specific thread by ID
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<Thread>> {
    Ok(Json(state.engine.get_thread(&thread_id).await?))
}
