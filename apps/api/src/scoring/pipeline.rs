//! Scoring Pipeline — the single entry point used by the submission workflow.
//!
//! Flow: render check → panel (fail-open) → aggregate → synthesize → report.
//!
//! The boundary is fail-fast: a stage error returns `ScoringReport::failure`
//! with safe defaults, never a partially-filled success. An empty panel is not
//! an error; it yields `success: true, analysis_available: false`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::application::ApplicationRecord;
use crate::scoring::aggregator::aggregate;
use crate::scoring::narrative::{NarrativeSynthesizer, ANALYSIS_UNAVAILABLE};
use crate::scoring::orchestrator::{AgentFailure, AgentOrchestrator};
use crate::scoring::types::{AgentResult, ConfidenceLevel, FinalRecommendation};

/// Per-invocation stages, used for logging and error attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    PanelRunning,
    Aggregating,
    Synthesizing,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::PanelRunning => "panel",
            Self::Aggregating => "aggregation",
            Self::Synthesizing => "synthesis",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("application cannot be scored: {0}")]
    InvalidRecord(String),

    #[error("scoring failed during {stage}: {message}")]
    Stage {
        stage: PipelineStage,
        message: String,
    },
}

/// Result handed back to the submission workflow and persisted with the
/// application. Every field is always populated; check `success` first, then
/// `analysis_available`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringReport {
    pub success: bool,
    /// False when no panel agent produced a result (or the pipeline failed).
    pub analysis_available: bool,
    pub overall_score: f64,
    pub final_recommendation: FinalRecommendation,
    pub confidence_level: ConfidenceLevel,
    pub key_decision_factors: Vec<String>,
    pub risk_assessment: String,
    pub next_steps: Vec<String>,
    pub executive_summary: String,
    pub agent_analyses: Vec<AgentResult>,
    pub failed_agents: Vec<AgentFailure>,
    pub error: Option<String>,
}

impl ScoringReport {
    /// Safe-default report for a pipeline that could not complete.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            analysis_available: false,
            overall_score: 0.0,
            final_recommendation: FinalRecommendation::Reject,
            confidence_level: ConfidenceLevel::Low,
            key_decision_factors: Vec::new(),
            risk_assessment: ANALYSIS_UNAVAILABLE.to_string(),
            next_steps: manual_review_steps(),
            executive_summary: ANALYSIS_UNAVAILABLE.to_string(),
            agent_analyses: Vec::new(),
            failed_agents: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Follow-ups whenever no automated analysis exists. Never suggests a
/// decision about the candidate.
pub fn manual_review_steps() -> Vec<String> {
    vec![
        "Review the application manually".to_string(),
        "Re-run automated scoring once the issue is resolved".to_string(),
    ]
}

pub struct ScoringPipeline {
    orchestrator: AgentOrchestrator,
    narrator: NarrativeSynthesizer,
}

impl ScoringPipeline {
    pub fn new(orchestrator: AgentOrchestrator, narrator: NarrativeSynthesizer) -> Self {
        Self {
            orchestrator,
            narrator,
        }
    }

    /// Scores one application. Never panics or errors; see `ScoringReport`.
    pub async fn score(&self, record: &ApplicationRecord, application_id: &str) -> ScoringReport {
        match self.run(record, application_id).await {
            Ok(report) => report,
            Err(e) => {
                error!(application_id, "Scoring pipeline failed: {e}");
                ScoringReport::failure(e.to_string())
            }
        }
    }

    async fn run(
        &self,
        record: &ApplicationRecord,
        application_id: &str,
    ) -> Result<ScoringReport, ScoringError> {
        let mut stage = PipelineStage::Start;
        debug!(application_id, %stage, "Scoring started");

        let candidate_name = record.candidate_name();
        if candidate_name.is_empty() {
            return Err(ScoringError::InvalidRecord(
                "candidate name is blank".to_string(),
            ));
        }
        if self.orchestrator.panel().is_empty() {
            return Err(ScoringError::Stage {
                stage,
                message: "scoring panel has no agents".to_string(),
            });
        }

        stage = PipelineStage::PanelRunning;
        debug!(application_id, %stage, agents = self.orchestrator.panel().len());
        let panel = self.orchestrator.run(record, application_id).await;
        if panel.is_total_failure() {
            warn!(
                application_id,
                failed = panel.failures.len(),
                "Every panel agent failed"
            );
        }

        stage = PipelineStage::Aggregating;
        debug!(application_id, %stage, results = panel.results.len());
        let aggregate = aggregate(&panel.results);

        stage = PipelineStage::Synthesizing;
        debug!(application_id, %stage);
        let executive_summary = self.narrator.synthesize(&candidate_name, &aggregate).await;

        stage = PipelineStage::Done;
        let analysis_available = !aggregate.is_empty();
        if analysis_available {
            info!(
                application_id,
                %stage,
                overall_score = aggregate.overall_score,
                recommendation = aggregate.final_recommendation.as_str(),
                confidence = aggregate.confidence_level.as_str(),
                "Scoring complete"
            );
        } else {
            info!(
                application_id,
                %stage,
                "Scoring complete — no panel agent succeeded, analysis unavailable"
            );
        }

        // The degenerate aggregate's REJECT guidance must not reach reviewers.
        let (risk_assessment, next_steps) = if analysis_available {
            (aggregate.risk_assessment, aggregate.next_steps)
        } else {
            (ANALYSIS_UNAVAILABLE.to_string(), manual_review_steps())
        };

        Ok(ScoringReport {
            success: true,
            analysis_available,
            overall_score: aggregate.overall_score,
            final_recommendation: aggregate.final_recommendation,
            confidence_level: aggregate.confidence_level,
            key_decision_factors: aggregate.key_decision_factors,
            risk_assessment,
            next_steps,
            executive_summary,
            agent_analyses: panel.results,
            failed_agents: panel.failures,
            error: None,
        })
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::scoring::narrative::fakes::{ScriptedSummary, SummaryScript};
    use crate::scoring::orchestrator::fakes::ScriptedEvaluator;
    use crate::scoring::panel::default_panel;

    pub fn pipeline_with(evaluator: ScriptedEvaluator, summary: SummaryScript) -> ScoringPipeline {
        ScoringPipeline::new(
            AgentOrchestrator::new(Arc::new(evaluator), default_panel(), Duration::from_secs(30)),
            NarrativeSynthesizer::new(Arc::new(ScriptedSummary(summary)), Duration::from_secs(30)),
        )
    }
}
