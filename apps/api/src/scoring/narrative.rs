//! Narrative Synthesizer — the executive summary attached to every report.
//!
//! Primary path asks the summary agent for 2–3 sentences. Any failure (provider
//! error, timeout, blank reply) falls back to a deterministic sentence built
//! from the aggregate, so the summary is never empty.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::llm_client::{LlmClient, LlmError};
use crate::scoring::prompts::{SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::scoring::types::AggregateResult;

/// Shown wherever automated scoring could not run.
pub const ANALYSIS_UNAVAILABLE: &str = "AI analysis unavailable — manual review required.";

/// Text-generation call behind the executive summary.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

/// Provider-backed summary generator.
pub struct LlmSummaryGenerator {
    llm: LlmClient,
}

impl LlmSummaryGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SummaryGenerator for LlmSummaryGenerator {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.llm.call_text(prompt, system).await
    }
}

pub struct NarrativeSynthesizer {
    generator: Arc<dyn SummaryGenerator>,
    timeout: Duration,
}

impl NarrativeSynthesizer {
    pub fn new(generator: Arc<dyn SummaryGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Returns a non-empty executive summary for `aggregate`.
    ///
    /// An aggregate computed from zero agents skips the provider entirely and
    /// returns `ANALYSIS_UNAVAILABLE`.
    pub async fn synthesize(&self, candidate_name: &str, aggregate: &AggregateResult) -> String {
        if aggregate.is_empty() {
            return ANALYSIS_UNAVAILABLE.to_string();
        }

        let prompt = build_summary_prompt(candidate_name, aggregate);
        let generated = tokio::time::timeout(
            self.timeout,
            self.generator.generate(&prompt, SUMMARY_SYSTEM),
        )
        .await;

        match generated {
            Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(Ok(_)) => {
                warn!("Summary agent returned blank text — using fallback summary");
                fallback_summary(candidate_name, aggregate)
            }
            Ok(Err(e)) => {
                warn!("Summary agent failed: {e} — using fallback summary");
                fallback_summary(candidate_name, aggregate)
            }
            Err(_) => {
                warn!(
                    "Summary agent timed out after {}s — using fallback summary",
                    self.timeout.as_secs()
                );
                fallback_summary(candidate_name, aggregate)
            }
        }
    }
}

fn build_summary_prompt(candidate_name: &str, aggregate: &AggregateResult) -> String {
    let key_factors = if aggregate.key_decision_factors.is_empty() {
        "(none)".to_string()
    } else {
        aggregate.key_decision_factors.join("\n")
    };

    SUMMARY_PROMPT_TEMPLATE
        .replace("{candidate_name}", display_name(candidate_name))
        .replace("{overall_score}", &format!("{:.1}", aggregate.overall_score))
        .replace(
            "{final_recommendation}",
            aggregate.final_recommendation.as_str(),
        )
        .replace("{confidence_level}", aggregate.confidence_level.as_str())
        .replace("{key_factors}", &key_factors)
        .replace("{risk_assessment}", &aggregate.risk_assessment)
}

/// Deterministic summary used when the summary agent is unavailable.
pub fn fallback_summary(candidate_name: &str, aggregate: &AggregateResult) -> String {
    if aggregate.is_empty() {
        return ANALYSIS_UNAVAILABLE.to_string();
    }
    format!(
        "{} received an overall panel score of {:.1}/10 from {} evaluator(s), \
        with a {} recommendation at {} confidence. \
        Review the individual agent analyses before deciding.",
        display_name(candidate_name),
        aggregate.overall_score,
        aggregate.agents_evaluated,
        aggregate.final_recommendation.as_str(),
        aggregate.confidence_level.as_str()
    )
}

fn display_name(candidate_name: &str) -> &str {
    let trimmed = candidate_name.trim();
    if trimmed.is_empty() {
        "The candidate"
    } else {
        trimmed
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test doubles, shared with the pipeline and router tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;

    pub enum SummaryScript {
        Text(&'static str),
        Fail,
        Hang,
    }

    pub struct ScriptedSummary(pub SummaryScript);

    #[async_trait]
    impl SummaryGenerator for ScriptedSummary {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            match &self.0 {
                SummaryScript::Text(text) => Ok(text.to_string()),
                SummaryScript::Fail => Err(LlmError::EmptyContent),
                SummaryScript::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(LlmError::EmptyContent)
                }
            }
        }
    }
}
