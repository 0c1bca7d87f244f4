use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use feedback_types::api::AddCommentRequest;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::{AppState, run_db};

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AddCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let sid = id.clone();
    let comment = run_db(&state, move |db| {
        db.append_comment(&sid, &req.author, &req.content)
    })
    .await?
    .map_err(|e| ApiError::from_store("add_comment", &id, e))?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let sid = id.clone();
    let comments = run_db(&state, move |db| db.list_comments(&sid))
        .await?
        .map_err(|e| ApiError::from_store("list_comments", &id, e))?;

    Ok(Json(comments))
}
