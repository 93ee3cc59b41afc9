//! Data models shared by every stage of the scoring pipeline.

use serde::{Deserialize, Serialize};

/// Lowest score a panel agent may assign.
pub const MIN_AGENT_SCORE: u8 = 1;
/// Highest score a panel agent may assign.
pub const MAX_AGENT_SCORE: u8 = 10;

/// An individual agent's verdict on the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentVerdict {
    Hire,
    Consider,
    Reject,
}

impl AgentVerdict {
    /// Parses a provider-supplied verdict. Case-insensitive, surrounding
    /// whitespace ignored; anything outside the closed set is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "HIRE" => Some(Self::Hire),
            "CONSIDER" => Some(Self::Consider),
            "REJECT" => Some(Self::Reject),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hire => "HIRE",
            Self::Consider => "CONSIDER",
            Self::Reject => "REJECT",
        }
    }
}

/// The panel's combined recommendation, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalRecommendation {
    StrongHire,
    Hire,
    Consider,
    WeakCandidate,
    Reject,
}

impl FinalRecommendation {
    #[cfg(test)]
    pub const ALL: [FinalRecommendation; 5] = [
        Self::StrongHire,
        Self::Hire,
        Self::Consider,
        Self::WeakCandidate,
        Self::Reject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongHire => "STRONG_HIRE",
            Self::Hire => "HIRE",
            Self::Consider => "CONSIDER",
            Self::WeakCandidate => "WEAK_CANDIDATE",
            Self::Reject => "REJECT",
        }
    }
}

/// How closely the panel agreed with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Ordinal used for comparisons: HIGH > MEDIUM > LOW.
    #[cfg(test)]
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 2,
            Self::Medium => 1,
            Self::Low => 0,
        }
    }
}

/// One validated evaluation produced by a single panel agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent_name: String,
    pub display_name: String,
    /// Set when the producing panel member is the designated risk reviewer.
    pub risk_focused: bool,
    /// Always within [MIN_AGENT_SCORE, MAX_AGENT_SCORE].
    pub score: u8,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub analysis: String,
    pub recommendation: AgentVerdict,
}

/// The panel's combined result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Mean agent score rounded to one decimal; 0.0 when no agent succeeded.
    pub overall_score: f64,
    pub final_recommendation: FinalRecommendation,
    pub confidence_level: ConfidenceLevel,
    /// At most six entries, each attributed to its source agent.
    pub key_decision_factors: Vec<String>,
    pub risk_assessment: String,
    pub next_steps: Vec<String>,
    /// Number of agent results the aggregate was computed from.
    pub agents_evaluated: usize,
}

impl AggregateResult {
    /// True when the aggregate was computed from zero agent results, i.e. the
    /// panel could not run, as opposed to the panel rejecting the candidate.
    pub fn is_empty(&self) -> bool {
        self.agents_evaluated == 0
    }
}
