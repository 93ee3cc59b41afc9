mod applications;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod notify;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::notify::{NotificationSink, Notifier, TracingSink, WebhookSink};
use crate::routes::build_router;
use crate::scoring::evaluator::LlmScoreEvaluator;
use crate::scoring::narrative::{LlmSummaryGenerator, NarrativeSynthesizer};
use crate::scoring::orchestrator::AgentOrchestrator;
use crate::scoring::panel::default_panel;
use crate::scoring::pipeline::ScoringPipeline;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Onboarding API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Scoring pipeline: panel → aggregate → executive summary
    let panel = default_panel();
    info!(
        "Scoring panel: {} agents, {}s per agent",
        panel.len(),
        config.agent_timeout.as_secs()
    );
    let orchestrator = AgentOrchestrator::new(
        Arc::new(LlmScoreEvaluator::new(llm.clone())),
        panel,
        config.agent_timeout,
    );
    let narrator = NarrativeSynthesizer::new(
        Arc::new(LlmSummaryGenerator::new(llm)),
        config.summary_timeout,
    );
    let pipeline = Arc::new(ScoringPipeline::new(orchestrator, narrator));

    // Notifications: webhook when configured, log-only otherwise
    let sink: Arc<dyn NotificationSink> = match &config.notify_webhook_url {
        Some(url) => {
            info!("Notifications delivered via webhook");
            Arc::new(WebhookSink::new(url.clone(), config.notify_timeout)?)
        }
        None => {
            info!("NOTIFY_WEBHOOK_URL not set; notifications will only be logged");
            Arc::new(TracingSink)
        }
    };
    let notifier = Arc::new(Notifier::new(
        sink,
        config.hr_recipients.clone(),
        config.notify_timeout,
    ));

    // Build app state
    let state = AppState {
        db,
        s3,
        config: config.clone(),
        pipeline,
        notifier,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "onboarding-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
