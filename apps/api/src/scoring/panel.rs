//! Panel definitions — the fixed set of evaluator perspectives run against
//! every application.
//!
//! Each `AgentSpec` names its perspective, carries the system instruction sent
//! to the provider, and lists the application sections it is allowed to see.

use serde::Serialize;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::scoring::prompts::{
    AGENT_OUTPUT_CONTRACT, CULTURAL_FIT_SYSTEM, EXPERIENCE_SYSTEM, INDUSTRY_FIT_SYSTEM,
    RISK_SYSTEM, TECHNICAL_SKILLS_SYSTEM,
};

/// A section of an `ApplicationRecord` that can be rendered for an agent.
/// Declaration order is the render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RecordSection {
    Position,
    WorkHistory,
    EmploymentGaps,
    Education,
    Skills,
    References,
    Assessment,
    CoverLetter,
    Resume,
}

/// Specification of one panel member.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSpec {
    /// Stable identifier, e.g. `technical_skills`.
    pub name: &'static str,
    /// Human-readable label used in decision factors and reports.
    pub display_name: &'static str,
    /// Specialty and weighted criteria, without the output contract.
    pub instruction: &'static str,
    pub sections: &'static [RecordSection],
    /// Marks the panel member whose analysis becomes the risk assessment.
    pub risk_focused: bool,
}

impl AgentSpec {
    /// Full system prompt: specialty + JSON-only rule + output schema.
    pub fn system_prompt(&self) -> String {
        format!(
            "{}\n\n{}\n\n{}",
            self.instruction,
            JSON_ONLY_SYSTEM,
            AGENT_OUTPUT_CONTRACT.replace("{agent_name}", self.name)
        )
    }
}

/// The five-member reference panel, in display order.
pub fn default_panel() -> Vec<AgentSpec> {
    use RecordSection::*;

    vec![
        AgentSpec {
            name: "technical_skills",
            display_name: "Technical Skills",
            instruction: TECHNICAL_SKILLS_SYSTEM,
            sections: &[Position, Skills, Assessment, Resume],
            risk_focused: false,
        },
        AgentSpec {
            name: "cultural_fit",
            display_name: "Cultural Fit",
            instruction: CULTURAL_FIT_SYSTEM,
            sections: &[Position, WorkHistory, Assessment, CoverLetter],
            risk_focused: false,
        },
        AgentSpec {
            name: "experience",
            display_name: "Experience & Trajectory",
            instruction: EXPERIENCE_SYSTEM,
            sections: &[Position, WorkHistory, Education, Resume],
            risk_focused: false,
        },
        AgentSpec {
            name: "risk",
            display_name: "Risk Assessment",
            instruction: RISK_SYSTEM,
            sections: &[WorkHistory, EmploymentGaps, References],
            risk_focused: true,
        },
        AgentSpec {
            name: "industry_fit",
            display_name: "Industry Fit",
            instruction: INDUSTRY_FIT_SYSTEM,
            sections: &[Position, WorkHistory, Skills],
            risk_focused: false,
        },
    ]
}
