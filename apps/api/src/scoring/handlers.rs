use axum::{extract::State, Json};

use crate::applications::intake::validate_record;
use crate::errors::AppError;
use crate::models::application::ApplicationRecord;
use crate::scoring::pipeline::ScoringReport;
use crate::state::AppState;

/// POST /api/v1/scoring/preview
/// Scores a record without storing it or notifying anyone.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(record): Json<ApplicationRecord>,
) -> Result<Json<ScoringReport>, AppError> {
    validate_record(&record)?;
    Ok(Json(state.pipeline.score(&record, "preview").await))
}
