//! Recommendation Aggregator — combines the panel's verdicts into one recommendation.
//!
//! Pure and infallible. An empty input produces the degenerate aggregate
//! (0.0 / REJECT / LOW) with `agents_evaluated == 0`.
//!
//! Algorithm:
//! 1. overall_score = mean(score), rounded to one decimal; 0.0 when empty
//! 2. tally HIRE / CONSIDER / REJECT votes
//! 3. first matching rule wins:
//!    - STRONG_HIRE     score ≥ 8 and hire ≥ 60% of votes
//!    - HIRE            score ≥ 7 and hire > reject
//!    - CONSIDER        score ≥ 5 and any consider
//!    - WEAK_CANDIDATE  score ≥ 4 and reject < 60% of votes
//!    - REJECT          otherwise
//! 4. confidence: LOW below 3 results, else by population std dev
//!    (≤1.5 HIGH, ≤2.5 MEDIUM, else LOW)

use crate::scoring::types::{
    AgentResult, AgentVerdict, AggregateResult, ConfidenceLevel, FinalRecommendation,
};

/// Fewer results than this always yields LOW confidence.
pub const MIN_RESULTS_FOR_CONFIDENCE: usize = 3;
pub const MAX_KEY_FACTORS: usize = 6;

const VOTE_MAJORITY: f64 = 0.6;
const HIGH_CONFIDENCE_MAX_STDDEV: f64 = 1.5;
const MEDIUM_CONFIDENCE_MAX_STDDEV: f64 = 2.5;

const NO_CONCERNS: &str = "No significant concerns identified.";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct VoteTally {
    hire: usize,
    consider: usize,
    reject: usize,
}

impl VoteTally {
    fn total(&self) -> usize {
        self.hire + self.consider + self.reject
    }
}

/// Aggregates `results` (in panel order) into a single recommendation.
pub fn aggregate(results: &[AgentResult]) -> AggregateResult {
    let overall_score = overall_score(results);
    let votes = tally(results);
    let final_recommendation = decide(overall_score, &votes);

    AggregateResult {
        overall_score,
        final_recommendation,
        confidence_level: confidence(results),
        key_decision_factors: key_decision_factors(results),
        risk_assessment: risk_assessment(results),
        next_steps: next_steps(final_recommendation),
        agents_evaluated: results.len(),
    }
}

fn overall_score(results: &[AgentResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let sum: f64 = results.iter().map(|r| r.score as f64).sum();
    round_one_decimal(sum / results.len() as f64)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn tally(results: &[AgentResult]) -> VoteTally {
    results
        .iter()
        .fold(VoteTally::default(), |mut votes, r| {
            match r.recommendation {
                AgentVerdict::Hire => votes.hire += 1,
                AgentVerdict::Consider => votes.consider += 1,
                AgentVerdict::Reject => votes.reject += 1,
            }
            votes
        })
}

fn decide(score: f64, votes: &VoteTally) -> FinalRecommendation {
    let majority = VOTE_MAJORITY * votes.total() as f64;

    if score >= 8.0 && votes.hire as f64 >= majority {
        FinalRecommendation::StrongHire
    } else if score >= 7.0 && votes.hire > votes.reject {
        FinalRecommendation::Hire
    } else if score >= 5.0 && votes.consider > 0 {
        FinalRecommendation::Consider
    } else if score >= 4.0 && (votes.reject as f64) < majority {
        FinalRecommendation::WeakCandidate
    } else {
        FinalRecommendation::Reject
    }
}

/// Population standard deviation of the agent scores.
fn score_std_dev(results: &[AgentResult]) -> f64 {
    let n = results.len() as f64;
    let mean = results.iter().map(|r| r.score as f64).sum::<f64>() / n;
    let variance = results
        .iter()
        .map(|r| (r.score as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    variance.sqrt()
}

fn confidence(results: &[AgentResult]) -> ConfidenceLevel {
    if results.len() < MIN_RESULTS_FOR_CONFIDENCE {
        return ConfidenceLevel::Low;
    }
    let std_dev = score_std_dev(results);
    if std_dev <= HIGH_CONFIDENCE_MAX_STDDEV {
        ConfidenceLevel::High
    } else if std_dev <= MEDIUM_CONFIDENCE_MAX_STDDEV {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

fn key_decision_factors(results: &[AgentResult]) -> Vec<String> {
    results
        .iter()
        .flat_map(|r| {
            let strength = r
                .strengths
                .first()
                .map(|s| format!("+ {}: {}", r.display_name, s));
            let concern = r
                .concerns
                .first()
                .map(|c| format!("⚠ {}: {}", r.display_name, c));
            strength.into_iter().chain(concern)
        })
        .take(MAX_KEY_FACTORS)
        .collect()
}

fn risk_assessment(results: &[AgentResult]) -> String {
    if let Some(risk) = results.iter().find(|r| r.risk_focused) {
        return risk.analysis.clone();
    }

    let concerns: Vec<&str> = results
        .iter()
        .flat_map(|r| r.concerns.iter().map(String::as_str))
        .take(2)
        .collect();

    match concerns.as_slice() {
        [] => NO_CONCERNS.to_string(),
        [only] => format!("Primary concern raised by the panel: {only}."),
        [first, second, ..] => {
            format!("Primary concerns raised by the panel: {first}; {second}.")
        }
    }
}

/// Static follow-up actions for each recommendation. Never empty.
pub fn next_steps(recommendation: FinalRecommendation) -> Vec<String> {
    let steps: &[&str] = match recommendation {
        FinalRecommendation::StrongHire => &[
            "Expedite interview scheduling",
            "Prepare a competitive offer",
            "Begin reference checks proactively",
        ],
        FinalRecommendation::Hire => &[
            "Schedule an interview with the hiring manager",
            "Verify key qualifications and certifications",
            "Conduct reference checks",
        ],
        FinalRecommendation::Consider => &[
            "Conduct a phone screen focused on the concerns raised",
            "Request additional detail or work samples",
            "Compare against other candidates in the pipeline",
        ],
        FinalRecommendation::WeakCandidate => &[
            "Hold for comparison against stronger candidates",
            "Consider for alternative roles",
        ],
        FinalRecommendation::Reject => &[
            "Send a polite rejection notice",
            "Retain the application on file for future openings",
        ],
    };
    steps.iter().map(|s| s.to_string()).collect()
}
