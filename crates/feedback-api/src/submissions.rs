use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use feedback_db::StoreResult;
use serde::Deserialize;

use feedback_types::api::{CreateSubmissionRequest, ListQuery, SubmissionDetail};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::{AppState, run_db};

/// POST /api/feedback: a client-supplied id makes the request safe to retry.
pub async fn create_submission(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = req.into_new_submission()?;
    let id = input.id.clone().unwrap_or_default();

    let (submission, inserted) = run_db(&state, move |db| match input.id.clone() {
        Some(id) => db.upsert_submission(&id, input),
        None => db.create_submission(input).map(|s| (s, true)),
    })
    .await?
    .map_err(|e| ApiError::from_store("create_submission", &id, e))?;

    // Retries of a known id update in place and stay silent.
    if inserted {
        state.notifier.submission_created(&submission);
    }

    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /api/feedback?type=&status=&sort=&voter=
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.into_filter()?;

    let submissions = run_db(&state, move |db| db.list_submissions(&filter))
        .await?
        .map_err(|e| ApiError::from_store("list_submissions", "", e))?;

    Ok(Json(submissions))
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub voter: Option<String>,
}

/// GET /api/feedback/{id}: one submission with counts and its comments.
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sid = id.clone();
    let detail = run_db(&state, move |db| -> StoreResult<Option<SubmissionDetail>> {
        let Some(summary) = db.get_summary(&sid, query.voter.as_deref())? else {
            return Ok(None);
        };
        let comment_list = db.list_comments(&sid)?;
        Ok(Some(SubmissionDetail {
            summary,
            comment_list,
        }))
    })
    .await?
    .map_err(|e| ApiError::from_store("get_submission", &id, e))?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(detail))
}
