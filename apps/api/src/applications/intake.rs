//! Submission workflow: validate, persist, snapshot, score, notify.
//!
//! The application row is written before scoring so a provider outage never
//! loses a submission. Scoring itself cannot fail the request; the stored
//! analysis records whether automated analysis was available.

use bytes::Bytes;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::uploads::{put_object, store_resume, ResumeUpload};
use crate::errors::AppError;
use crate::models::analysis::{AnalysisRow, ApplicationRow};
use crate::models::application::ApplicationRecord;
use crate::scoring::pipeline::ScoringReport;
use crate::scoring::render::render_full;
use crate::state::AppState;

/// Longest accepted value for a single free-text field.
const MAX_FIELD_CHARS: usize = 10_000;

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub application_id: Uuid,
    pub report: ScoringReport,
}

#[derive(Debug, Serialize)]
pub struct ApplicationDetail {
    pub application: ApplicationRow,
    pub analysis: Option<AnalysisRow>,
}

/// Boundary checks on a submitted record. Everything past this point may
/// assume a non-blank name, position and a plausible email.
pub fn validate_record(record: &ApplicationRecord) -> Result<(), AppError> {
    let personal = &record.personal;
    if personal.first_name.trim().is_empty() {
        return Err(AppError::Validation("first_name is required".to_string()));
    }
    if personal.last_name.trim().is_empty() {
        return Err(AppError::Validation("last_name is required".to_string()));
    }
    if personal.position_applied.trim().is_empty() {
        return Err(AppError::Validation(
            "position_applied is required".to_string(),
        ));
    }
    if !is_plausible_email(&personal.email) {
        return Err(AppError::Validation(format!(
            "email '{}' is not a valid address",
            personal.email.trim()
        )));
    }

    for (i, job) in record.work_history.iter().enumerate() {
        if job.employer.trim().is_empty() || job.title.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "work_history[{i}] needs both employer and title"
            )));
        }
    }
    for (i, answer) in record.assessment_answers.iter().enumerate() {
        if answer.question.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "assessment_answers[{i}] has a blank question"
            )));
        }
    }

    let free_text = [
        ("cover_letter", record.cover_letter.as_deref()),
        (
            "employment_gap_explanation",
            record.employment_gap_explanation.as_deref(),
        ),
    ];
    for (field, value) in free_text {
        if value.map(|v| v.chars().count() > MAX_FIELD_CHARS).unwrap_or(false) {
            return Err(AppError::Validation(format!(
                "{field} exceeds {MAX_FIELD_CHARS} characters"
            )));
        }
    }

    Ok(())
}

fn is_plausible_email(raw: &str) -> bool {
    let email = raw.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn snapshot_key(application_id: Uuid) -> String {
    format!("applications/{application_id}/application.txt")
}

/// Full submission flow. Objects are only written once the row exists, so a
/// failed insert never leaves anything behind in the bucket.
pub async fn submit_application(
    state: &AppState,
    application_id: Uuid,
    record: ApplicationRecord,
    resume: Option<ResumeUpload>,
) -> Result<SubmissionResponse, AppError> {
    validate_record(&record)?;

    insert_application(&state.db, application_id, &record).await?;
    info!(%application_id, "Application stored");

    if let Some(resume) = resume {
        attach_resume(state, application_id, &resume).await?;
    }

    // The snapshot is a convenience copy for reviewers; the row above is the
    // record of truth.
    let key = snapshot_key(application_id);
    let snapshot = Bytes::from(render_full(&record).into_bytes());
    match put_object(&state.s3, &state.config.s3_bucket, &key, snapshot, "text/plain", &[]).await {
        Ok(()) => set_snapshot_key(&state.db, application_id, &key).await?,
        Err(e) => warn!(%application_id, "Application snapshot not stored: {e}"),
    }

    let report = state
        .pipeline
        .score(&record, &application_id.to_string())
        .await;
    insert_analysis(&state.db, application_id, &report).await?;

    let notifier = state.notifier.clone();
    let notified_report = report.clone();
    tokio::spawn(async move {
        notifier
            .dispatch(application_id, &record, &notified_report)
            .await;
    });

    Ok(SubmissionResponse {
        application_id,
        report,
    })
}

/// Stores the resume under the application and records its key. A storage
/// failure is logged; the submission goes ahead without the attachment.
async fn attach_resume(
    state: &AppState,
    application_id: Uuid,
    resume: &ResumeUpload,
) -> Result<(), AppError> {
    let file_name = resume.file_name.as_deref().unwrap_or("(unnamed)");
    match store_resume(&state.s3, &state.config.s3_bucket, application_id, resume).await {
        Ok(key) => {
            sqlx::query("UPDATE applications SET resume_s3_key = $1 WHERE id = $2")
                .bind(&key)
                .bind(application_id)
                .execute(&state.db)
                .await?;
            info!(
                %application_id,
                kind = resume.kind.extension(),
                file_name,
                "Resume stored"
            );
        }
        Err(e) => warn!(%application_id, file_name, "Resume not stored: {e}"),
    }
    Ok(())
}

/// Runs the pipeline again over a stored record and appends the analysis.
pub async fn rescore_application(
    state: &AppState,
    application_id: Uuid,
) -> Result<SubmissionResponse, AppError> {
    let row = fetch_application(&state.db, application_id).await?;
    let record: ApplicationRecord = serde_json::from_value(row.record)
        .map_err(|e| anyhow::anyhow!("stored application {application_id} is unreadable: {e}"))?;

    let report = state
        .pipeline
        .score(&record, &application_id.to_string())
        .await;
    insert_analysis(&state.db, application_id, &report).await?;
    info!(%application_id, "Application re-scored");

    Ok(SubmissionResponse {
        application_id,
        report,
    })
}

/// Stored record plus its most recent analysis.
pub async fn get_application(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<ApplicationDetail, AppError> {
    let application = fetch_application(pool, application_id).await?;
    let analysis = sqlx::query_as::<_, AnalysisRow>(
        "SELECT * FROM application_analyses WHERE application_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(application_id)
    .fetch_optional(pool)
    .await?;

    Ok(ApplicationDetail {
        application,
        analysis,
    })
}

async fn fetch_application(pool: &PgPool, application_id: Uuid) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(application_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))
}

async fn insert_application(
    pool: &PgPool,
    application_id: Uuid,
    record: &ApplicationRecord,
) -> Result<(), AppError> {
    let record_json = serde_json::to_value(record)
        .map_err(|e| anyhow::anyhow!("application could not be serialized: {e}"))?;

    sqlx::query(
        r#"
        INSERT INTO applications
            (id, candidate_name, email, position_applied, record)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(application_id)
    .bind(record.candidate_name())
    .bind(record.personal.email.trim())
    .bind(record.personal.position_applied.trim())
    .bind(record_json)
    .execute(pool)
    .await?;
    Ok(())
}

async fn set_snapshot_key(pool: &PgPool, application_id: Uuid, key: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE applications SET snapshot_s3_key = $1 WHERE id = $2")
        .bind(key)
        .bind(application_id)
        .execute(pool)
        .await?;
    Ok(())
}

async fn insert_analysis(
    pool: &PgPool,
    application_id: Uuid,
    report: &ScoringReport,
) -> Result<(), AppError> {
    let report_json = serde_json::to_value(report)
        .map_err(|e| anyhow::anyhow!("scoring report could not be serialized: {e}"))?;

    sqlx::query(
        r#"
        INSERT INTO application_analyses
            (id, application_id, success, analysis_available, overall_score,
             final_recommendation, confidence_level, report)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(application_id)
    .bind(report.success)
    .bind(report.analysis_available)
    .bind(report.overall_score)
    .bind(report.final_recommendation.as_str())
    .bind(report.confidence_level.as_str())
    .bind(report_json)
    .execute(pool)
    .await?;
    Ok(())
}
