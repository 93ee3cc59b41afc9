use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::applications::intake::{
    get_application, rescore_application, submit_application, validate_record,
    ApplicationDetail, SubmissionResponse,
};
use crate::applications::uploads::{extract_pdf_text, read_submission, ResumeKind};
use crate::errors::AppError;
use crate::models::application::ApplicationRecord;
use crate::state::AppState;

/// POST /api/v1/applications
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(record): Json<ApplicationRecord>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let response = submit_application(&state, Uuid::new_v4(), record, None).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/applications/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let submission = read_submission(multipart, state.config.max_upload_bytes).await?;
    let mut record = submission.record;
    // Reject a bad record before anything reaches the bucket.
    validate_record(&record)?;

    // Text goes into the stored record, so extraction runs before the insert.
    if let Some(resume) = &submission.resume {
        if resume.kind == ResumeKind::Pdf && record.resume_text.is_none() {
            record.resume_text = extract_pdf_text(resume.bytes.clone()).await;
        }
    }

    let response =
        submit_application(&state, Uuid::new_v4(), record, submission.resume).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetail>, AppError> {
    Ok(Json(get_application(&state.db, id).await?))
}

/// POST /api/v1/applications/:id/score
pub async fn handle_rescore(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionResponse>, AppError> {
    Ok(Json(rescore_application(&state, id).await?))
}
