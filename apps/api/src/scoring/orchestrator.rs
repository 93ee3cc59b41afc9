//! Agent Orchestrator — runs the whole panel concurrently against one application.
//!
//! Fail-open: every agent is dispatched at once, every outcome is awaited, and
//! whichever agents succeed are handed on. A timeout or bad reply drops that
//! agent only. No retries happen at this layer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::application::ApplicationRecord;
use crate::scoring::evaluator::{EvaluationError, ScoreEvaluator};
use crate::scoring::panel::AgentSpec;
use crate::scoring::render::render_sections;
use crate::scoring::types::AgentResult;

/// Why one panel agent produced no result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFailure {
    pub agent_name: String,
    pub display_name: String,
    pub reason: String,
}

/// Everything the panel produced for one application.
#[derive(Debug, Clone, Default)]
pub struct PanelOutcome {
    /// Successful results, in panel order.
    pub results: Vec<AgentResult>,
    pub failures: Vec<AgentFailure>,
}

impl PanelOutcome {
    /// True when no agent produced a usable result.
    pub fn is_total_failure(&self) -> bool {
        self.results.is_empty()
    }
}

pub struct AgentOrchestrator {
    evaluator: Arc<dyn ScoreEvaluator>,
    panel: Vec<AgentSpec>,
    agent_timeout: Duration,
}

impl AgentOrchestrator {
    pub fn new(
        evaluator: Arc<dyn ScoreEvaluator>,
        panel: Vec<AgentSpec>,
        agent_timeout: Duration,
    ) -> Self {
        Self {
            evaluator,
            panel,
            agent_timeout,
        }
    }

    pub fn panel(&self) -> &[AgentSpec] {
        &self.panel
    }

    /// Evaluates `record` with every panel member concurrently.
    ///
    /// Total latency tracks the slowest agent (bounded by the per-agent
    /// timeout), not the sum.
    pub async fn run(&self, record: &ApplicationRecord, application_id: &str) -> PanelOutcome {
        let started = Instant::now();

        let calls = self.panel.iter().map(|agent| {
            let text = render_sections(record, agent.sections);
            async move {
                let outcome =
                    tokio::time::timeout(self.agent_timeout, self.evaluator.evaluate(agent, &text))
                        .await
                        .map_err(|_| EvaluationError::Timeout(self.agent_timeout))
                        .and_then(|inner| inner);
                (agent, outcome)
            }
        });

        let mut outcome = PanelOutcome::default();
        for (agent, result) in join_all(calls).await {
            match result {
                Ok(agent_result) => {
                    debug!(
                        application_id,
                        agent = agent.name,
                        score = agent_result.score,
                        "Panel agent succeeded"
                    );
                    outcome.results.push(agent_result);
                }
                Err(e) => {
                    warn!(application_id, agent = agent.name, "Panel agent failed: {e}");
                    outcome.failures.push(AgentFailure {
                        agent_name: agent.name.to_string(),
                        display_name: agent.display_name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(
            application_id,
            succeeded = outcome.results.len(),
            failed = outcome.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Panel finished"
        );

        outcome
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test doubles, shared with the pipeline and router tests
// ────────────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::fakes::{Script, ScriptedEvaluator};
    use super::*;
    use crate::models::application::PersonalInfo;
    use crate::scoring::panel::default_panel;
    use crate::scoring::types::AgentVerdict;

    fn record() -> ApplicationRecord {
        ApplicationRecord {
            personal: PersonalInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                position_applied: "Systems Engineer".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn orchestrator(evaluator: ScriptedEvaluator) -> AgentOrchestrator {
        AgentOrchestrator::new(
            Arc::new(evaluator),
            default_panel(),
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn test_all_agents_succeed_in_panel_order() {
        let orch = orchestrator(ScriptedEvaluator::uniform(8, AgentVerdict::Hire));
        let outcome = orch.run(&record(), "app-1").await;

        assert_eq!(outcome.results.len(), 5);
        assert!(outcome.failures.is_empty());
        let names: Vec<_> = outcome.results.iter().map(|r| r.agent_name.as_str()).collect();
        let expected: Vec<_> = default_panel().iter().map(|a| a.name).collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_survivors() {
        let orch = orchestrator(ScriptedEvaluator::new(vec![
            ("technical_skills", Script::Score(9, AgentVerdict::Hire)),
            ("risk", Script::Score(9, AgentVerdict::Hire)),
            ("cultural_fit", Script::Fail),
        ]));
        let outcome = orch.run(&record(), "app-2").await;

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.failures.len(), 3);
        assert!(!outcome.is_total_failure());
        assert!(outcome
            .failures
            .iter()
            .any(|f| f.agent_name == "cultural_fit" && f.reason.contains("scripted failure")));
    }

    #[tokio::test]
    async fn test_total_failure_reports_empty_results() {
        let orch = orchestrator(ScriptedEvaluator::new(vec![]));
        let outcome = orch.run(&record(), "app-3").await;

        assert!(outcome.is_total_failure());
        assert_eq!(outcome.failures.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_recorded_without_dropping_other_agents() {
        let orch = orchestrator(ScriptedEvaluator::new(vec![
            ("technical_skills", Script::Score(7, AgentVerdict::Hire)),
            ("cultural_fit", Script::Score(6, AgentVerdict::Consider)),
            ("experience", Script::Hang),
            ("risk", Script::Score(7, AgentVerdict::Hire)),
            ("industry_fit", Script::Score(8, AgentVerdict::Hire)),
        ]));
        let outcome = orch.run(&record(), "app-4").await;

        assert_eq!(outcome.results.len(), 4);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].agent_name, "experience");
        assert_eq!(outcome.failures[0].display_name, "Experience & Trajectory");
        assert!(outcome.failures[0].reason.contains("timed out after 30s"));
    }

    /// Records the text each agent was given.
    struct CapturingEvaluator {
        seen: std::sync::Mutex<Vec<(String, String)>>,
    }

    #[async_trait::async_trait]
    impl ScoreEvaluator for CapturingEvaluator {
        async fn evaluate(
            &self,
            agent: &AgentSpec,
            application_text: &str,
        ) -> Result<AgentResult, EvaluationError> {
            self.seen
                .lock()
                .unwrap()
                .push((agent.name.to_string(), application_text.to_string()));
            Err(EvaluationError::InvalidResponse("capture only".to_string()))
        }
    }

    #[tokio::test]
    async fn test_each_agent_sees_only_its_own_sections() {
        let capturing = Arc::new(CapturingEvaluator {
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let orch = AgentOrchestrator::new(capturing.clone(), default_panel(), Duration::from_secs(5));
        orch.run(&record(), "app-5").await;

        let seen = capturing.seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        let risk_text = &seen.iter().find(|(name, _)| name == "risk").unwrap().1;
        assert!(risk_text.contains("REFERENCES"));
        assert!(!risk_text.contains("PLATFORM EXPERIENCE"));
        let technical_text = &seen
            .iter()
            .find(|(name, _)| name == "technical_skills")
            .unwrap()
            .1;
        assert!(technical_text.contains("PLATFORM EXPERIENCE"));
        assert!(!technical_text.contains("REFERENCES"));
    }
}
