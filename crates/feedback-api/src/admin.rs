use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use tracing::{error, info};

use feedback_types::api::{ListQuery, SuccessResponse, UpdateStatusRequest};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::export::{EXPORT_FILENAME, render_csv};
use crate::state::{AppState, run_db};

/// PATCH /api/admin/feedback/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = req.status()?;

    let sid = id.clone();
    run_db(&state, move |db| db.update_status(&sid, status))
        .await?
        .map_err(|e| ApiError::from_store("update_status", &id, e))?;

    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/admin/feedback/{id}: removes votes and comments too.
pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let sid = id.clone();
    run_db(&state, move |db| db.delete_submission(&sid))
        .await?
        .map_err(|e| ApiError::from_store("delete_submission", &id, e))?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/admin/feedback/export: the filtered/sorted view as CSV.
pub async fn export_submissions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut filter = query.into_filter()?;
    filter.voter_id = None;

    let submissions = run_db(&state, move |db| db.list_submissions(&filter))
        .await?
        .map_err(|e| ApiError::from_store("export_submissions", "", e))?;

    let body = render_csv(&submissions).map_err(|e| {
        error!("CSV export failed: {}", e);
        ApiError::Internal
    })?;

    info!("Exported {} submissions", submissions.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        body,
    ))
}
