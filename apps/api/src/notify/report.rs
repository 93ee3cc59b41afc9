//! Plain-text rendering of a scoring report for HR notifications.
//!
//! The block never shows a numeric score when automated analysis did not run;
//! it says so plainly instead.

use std::fmt::Write;

use crate::scoring::narrative::ANALYSIS_UNAVAILABLE;
use crate::scoring::pipeline::ScoringReport;

/// Renders the recommendation block for one candidate.
pub fn render_report(candidate_name: &str, position: &str, report: &ScoringReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Candidate: {candidate_name}");
    let _ = writeln!(out, "Position: {position}");
    out.push('\n');

    if !report.success || !report.analysis_available {
        let _ = writeln!(out, "{ANALYSIS_UNAVAILABLE}");
        if !report.failed_agents.is_empty() {
            let _ = writeln!(
                out,
                "({} of the automated evaluators could not complete.)",
                report.failed_agents.len()
            );
        }
        out.push('\n');
        render_list(&mut out, "Next steps", &report.next_steps);
        return out;
    }

    let _ = writeln!(
        out,
        "Recommendation: {} ({} confidence)",
        report.final_recommendation.as_str(),
        report.confidence_level.as_str()
    );
    let _ = writeln!(
        out,
        "Overall score: {:.1}/10 from {} evaluator(s)",
        report.overall_score,
        report.agent_analyses.len()
    );
    out.push('\n');
    let _ = writeln!(out, "Summary: {}", report.executive_summary);
    out.push('\n');

    render_list(&mut out, "Key decision factors", &report.key_decision_factors);
    let _ = writeln!(out, "Risk assessment: {}", report.risk_assessment);
    out.push('\n');

    let _ = writeln!(out, "Evaluator scores:");
    for agent in &report.agent_analyses {
        let _ = writeln!(
            out,
            "- {}: {}/10 ({})",
            agent.display_name,
            agent.score,
            agent.recommendation.as_str()
        );
    }
    for failed in &report.failed_agents {
        let _ = writeln!(out, "- {}: unavailable", failed.display_name);
    }
    out.push('\n');

    render_list(&mut out, "Next steps", &report.next_steps);
    out
}

fn render_list(out: &mut String, heading: &str, items: &[String]) {
    let _ = writeln!(out, "{heading}:");
    if items.is_empty() {
        let _ = writeln!(out, "- (none)");
    }
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}
