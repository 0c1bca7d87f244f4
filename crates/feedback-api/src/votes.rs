use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use feedback_types::api::{ToggleVoteRequest, ToggleVoteResponse};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::{AppState, run_db};

/// POST /api/feedback/{id}/vote: toggle the caller's vote.
///
/// `voter_id` is an unverified client token (usually a pseudo-id kept in
/// browser storage). A voter who resets it can vote again.
pub async fn toggle_vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ToggleVoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let sid = id.clone();
    let voted = run_db(&state, move |db| db.toggle_vote(&sid, &req.voter_id))
        .await?
        .map_err(|e| ApiError::from_store("toggle_vote", &id, e))?;

    Ok(Json(ToggleVoteResponse { voted }))
}
