use axum::{
    extract::{Path, State},
    Json,
};
use draftline::DraftView;
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

/// Current draft with its most recent deltas
pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<DraftView>> {
    Ok(Json(state.engine.get_draft(&thread_id).await?))
}
