//! Score Evaluator — one panel agent's call to the scoring provider.
//!
//! The provider reply is untrusted JSON. `validate_agent_response` turns it into
//! a well-typed `AgentResult` or rejects it outright; partial or out-of-range
//! data is never coerced into a result.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Number;
use thiserror::Error;

use crate::llm_client::{LlmClient, LlmError};
use crate::scoring::panel::AgentSpec;
use crate::scoring::types::{AgentResult, AgentVerdict, MAX_AGENT_SCORE, MIN_AGENT_SCORE};

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("provider call failed: {0}")]
    Provider(LlmError),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl From<LlmError> for EvaluationError {
    fn from(err: LlmError) -> Self {
        match err {
            // Unparseable JSON is a response-shape problem, not a transport one.
            LlmError::Parse(e) => EvaluationError::InvalidResponse(format!("malformed JSON: {e}")),
            other => EvaluationError::Provider(other),
        }
    }
}

/// Runs one panel agent against a rendered application.
///
/// Carried by the orchestrator as `Arc<dyn ScoreEvaluator>`; tests substitute
/// fakes without touching the network.
#[async_trait]
pub trait ScoreEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        agent: &AgentSpec,
        application_text: &str,
    ) -> Result<AgentResult, EvaluationError>;
}

/// Provider-backed evaluator.
pub struct LlmScoreEvaluator {
    llm: LlmClient,
}

impl LlmScoreEvaluator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ScoreEvaluator for LlmScoreEvaluator {
    async fn evaluate(
        &self,
        agent: &AgentSpec,
        application_text: &str,
    ) -> Result<AgentResult, EvaluationError> {
        let raw: RawAgentResponse = self
            .llm
            .call_json(application_text, &agent.system_prompt())
            .await?;

        validate_agent_response(agent, raw)
    }
}

/// The reply shape as the provider sends it. Every field is optional here so
/// that a missing field surfaces as a validation error naming it.
#[derive(Debug, Deserialize)]
pub struct RawAgentResponse {
    pub score: Option<Number>,
    pub strengths: Option<Vec<String>>,
    pub concerns: Option<Vec<String>>,
    pub analysis: Option<String>,
    pub recommendation: Option<String>,
}

/// Validates a raw reply against the `AgentResult` contract.
///
/// Rules: every field present; `score` integral and within [1,10] (`7.0` is
/// accepted, `7.5` is not); `recommendation` in the closed verdict set;
/// `analysis` non-blank. Blank list entries are dropped.
pub fn validate_agent_response(
    agent: &AgentSpec,
    raw: RawAgentResponse,
) -> Result<AgentResult, EvaluationError> {
    let score = raw.score.ok_or_else(|| missing("score"))?;
    let score = integral(&score)
        .filter(|s| ((MIN_AGENT_SCORE as i64)..=(MAX_AGENT_SCORE as i64)).contains(s))
        .ok_or_else(|| {
            EvaluationError::InvalidResponse(format!(
                "score {score} is not an integer in {MIN_AGENT_SCORE}..={MAX_AGENT_SCORE}"
            ))
        })? as u8;

    let strengths = clean_findings(raw.strengths.ok_or_else(|| missing("strengths"))?);
    let concerns = clean_findings(raw.concerns.ok_or_else(|| missing("concerns"))?);

    let analysis = raw
        .analysis
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| missing("analysis"))?;

    let verdict = raw.recommendation.ok_or_else(|| missing("recommendation"))?;
    let recommendation = AgentVerdict::parse(&verdict).ok_or_else(|| {
        EvaluationError::InvalidResponse(format!("unknown recommendation '{verdict}'"))
    })?;

    Ok(AgentResult {
        agent_name: agent.name.to_string(),
        display_name: agent.display_name.to_string(),
        risk_focused: agent.risk_focused,
        score,
        strengths,
        concerns,
        analysis,
        recommendation,
    })
}

fn missing(field: &str) -> EvaluationError {
    EvaluationError::InvalidResponse(format!("missing or empty field '{field}'"))
}

fn integral(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

fn clean_findings(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::panel::default_panel;

    fn risk_agent() -> AgentSpec {
        default_panel()
            .into_iter()
            .find(|a| a.risk_focused)
            .unwrap()
    }

    fn parse(json: &str) -> Result<AgentResult, EvaluationError> {
        let raw: RawAgentResponse = serde_json::from_str(json).unwrap();
        validate_agent_response(&risk_agent(), raw)
    }

    #[test]
    fn test_valid_response_produces_agent_result() {
        let result = parse(
            r#"{
                "agent_name": "risk",
                "score": 8,
                "strengths": ["Stable tenure", "  "],
                "concerns": ["One short gap"],
                "analysis": "Low risk overall.",
                "recommendation": "hire"
            }"#,
        )
        .unwrap();

        assert_eq!(result.agent_name, "risk");
        assert_eq!(result.display_name, "Risk Assessment");
        assert!(result.risk_focused);
        assert_eq!(result.score, 8);
        assert_eq!(result.strengths, vec!["Stable tenure".to_string()]);
        assert_eq!(result.concerns.len(), 1);
        assert_eq!(result.recommendation, AgentVerdict::Hire);
    }

    #[test]
    fn test_integral_float_score_is_accepted() {
        let result = parse(
            r#"{"score": 7.0, "strengths": [], "concerns": [],
                "analysis": "ok", "recommendation": "CONSIDER"}"#,
        )
        .unwrap();
        assert_eq!(result.score, 7);
    }

    #[test]
    fn test_fractional_score_is_rejected() {
        let err = parse(
            r#"{"score": 7.5, "strengths": [], "concerns": [],
                "analysis": "ok", "recommendation": "CONSIDER"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidResponse(_)));
    }

    #[test]
    fn test_out_of_range_scores_are_rejected() {
        for score in ["0", "11", "-3", "100"] {
            let json = format!(
                r#"{{"score": {score}, "strengths": [], "concerns": [],
                    "analysis": "ok", "recommendation": "HIRE"}}"#
            );
            assert!(parse(&json).is_err(), "score {score} should be rejected");
        }
    }

    #[test]
    fn test_boundary_scores_are_accepted() {
        for score in [1, 10] {
            let json = format!(
                r#"{{"score": {score}, "strengths": [], "concerns": [],
                    "analysis": "ok", "recommendation": "REJECT"}}"#
            );
            assert_eq!(parse(&json).unwrap().score, score);
        }
    }

    #[test]
    fn test_missing_score_is_rejected() {
        let err = parse(
            r#"{"strengths": [], "concerns": [], "analysis": "ok", "recommendation": "HIRE"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("score"));
    }

    #[test]
    fn test_blank_analysis_is_rejected() {
        let err = parse(
            r#"{"score": 5, "strengths": [], "concerns": [],
                "analysis": "   ", "recommendation": "HIRE"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("analysis"));
    }

    #[test]
    fn test_missing_lists_are_rejected() {
        let err = parse(r#"{"score": 5, "analysis": "ok", "recommendation": "HIRE"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("strengths"));
    }

    #[test]
    fn test_unknown_recommendation_is_rejected() {
        let err = parse(
            r#"{"score": 9, "strengths": [], "concerns": [],
                "analysis": "ok", "recommendation": "STRONG_HIRE"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("STRONG_HIRE"));
    }

    #[test]
    fn test_malformed_list_fails_deserialization() {
        let result: Result<RawAgentResponse, _> = serde_json::from_str(
            r#"{"score": 5, "strengths": "not a list", "concerns": [],
                "analysis": "ok", "recommendation": "HIRE"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_string_score_fails_deserialization() {
        let result: Result<RawAgentResponse, _> = serde_json::from_str(
            r#"{"score": "7", "strengths": [], "concerns": [],
                "analysis": "ok", "recommendation": "HIRE"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_llm_parse_error_maps_to_invalid_response() {
        let parse_err = serde_json::from_str::<RawAgentResponse>("not json").unwrap_err();
        let err: EvaluationError = LlmError::Parse(parse_err).into();
        assert!(matches!(err, EvaluationError::InvalidResponse(_)));

        let err: EvaluationError = LlmError::EmptyContent.into();
        assert!(matches!(err, EvaluationError::Provider(_)));
    }
}
