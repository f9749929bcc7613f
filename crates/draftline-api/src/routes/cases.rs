use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use draftline::{Case, CaseTracker, ResolutionInput};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpRequest {
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

fn tracker(state: &AppState) -> ApiResult<&Arc<CaseTracker>> {
    state
        .engine
        .cases()
        .ok_or_else(|| ApiError::Config("case tracking is disabled".to_string()))
}

/// All cases, most recently updated first
pub async fn list_cases(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Case>>> {
    Ok(Json(tracker(&state)?.list().await))
}

pub async fn get_case(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
) -> ApiResult<Json<Case>> {
    Ok(Json(tracker(&state)?.get(&case_id).await?))
}

/// Record the outcome of a case
pub async fn submit_resolution(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
    Json(input): Json<ResolutionInput>,
) -> ApiResult<Json<Case>> {
    Ok(Json(tracker(&state)?.resolve(&case_id, input).await?))
}

/// Cases whose follow-up is due now
pub async fn due_follow_ups(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Case>>> {
    Ok(Json(tracker(&state)?.due_follow_ups(Utc::now()).await))
}

/// Record that a follow-up was sent
pub async fn mark_follow_up_sent(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
    body: Option<Json<FollowUpRequest>>,
) -> ApiResult<Json<Case>> {
    let Json(req) = body.unwrap_or_default();
    let sent_at = req.sent_at.unwrap_or_else(Utc::now);
    Ok(Json(
        tracker(&state)?
            .mark_follow_up_sent(&case_id, sent_at)
            .await?,
    ))
}
