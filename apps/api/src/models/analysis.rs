use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub candidate_name: String,
    pub email: String,
    pub position_applied: String,
    /// Full `ApplicationRecord` as submitted.
    pub record: Value,
    pub resume_s3_key: Option<String>,
    pub snapshot_s3_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub success: bool,
    pub analysis_available: bool,
    pub overall_score: f64,
    pub final_recommendation: String,
    pub confidence_level: String,
    /// Full `ScoringReport` JSON.
    pub report: Value,
    pub created_at: DateTime<Utc>,
}
