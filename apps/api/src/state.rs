use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::notify::Notifier;
use crate::scoring::pipeline::ScoringPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Panel, aggregation and summary wiring. Swapped for scripted fakes in tests.
    pub pipeline: Arc<ScoringPipeline>,
    pub notifier: Arc<Notifier>,
}
