//! Deterministic text projection of an `ApplicationRecord`.
//!
//! Agents see only the sections their `AgentSpec` lists. Sections always render
//! in `RecordSection` order, and an empty section renders an explicit
//! "none provided" line so the absence is visible to the evaluator.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::models::application::ApplicationRecord;
use crate::scoring::panel::RecordSection;

const NONE_PROVIDED: &str = "(none provided)";

/// Every section, for the stored snapshot.
pub const ALL_SECTIONS: &[RecordSection] = &[
    RecordSection::Position,
    RecordSection::WorkHistory,
    RecordSection::EmploymentGaps,
    RecordSection::Education,
    RecordSection::Skills,
    RecordSection::References,
    RecordSection::Assessment,
    RecordSection::CoverLetter,
    RecordSection::Resume,
];

/// Renders the requested sections of `record`, headed by the candidate's name.
pub fn render_sections(record: &ApplicationRecord, sections: &[RecordSection]) -> String {
    let ordered: BTreeSet<RecordSection> = sections.iter().copied().collect();

    let mut out = String::new();
    let _ = writeln!(out, "CANDIDATE: {}", record.candidate_name());

    for section in ordered {
        out.push('\n');
        match section {
            RecordSection::Position => render_position(record, &mut out),
            RecordSection::WorkHistory => render_work_history(record, &mut out),
            RecordSection::EmploymentGaps => render_gaps(record, &mut out),
            RecordSection::Education => render_education(record, &mut out),
            RecordSection::Skills => render_skills(record, &mut out),
            RecordSection::References => render_references(record, &mut out),
            RecordSection::Assessment => render_assessment(record, &mut out),
            RecordSection::CoverLetter => {
                render_free_text("COVER LETTER", record.cover_letter.as_deref(), &mut out)
            }
            RecordSection::Resume => {
                render_free_text("RESUME", record.resume_text.as_deref(), &mut out)
            }
        }
    }

    out
}

/// Renders the whole record.
pub fn render_full(record: &ApplicationRecord) -> String {
    render_sections(record, ALL_SECTIONS)
}

fn render_position(record: &ApplicationRecord, out: &mut String) {
    let p = &record.personal;
    let _ = writeln!(out, "POSITION APPLIED FOR: {}", p.position_applied.trim());
    if let Some(kind) = non_blank(p.employment_type.as_deref()) {
        let _ = writeln!(out, "Employment type: {kind}");
    }
    if let Some(date) = p.desired_start_date {
        let _ = writeln!(out, "Desired start date: {date}");
    }
    let location: Vec<&str> = [p.city.as_deref(), p.state.as_deref()]
        .into_iter()
        .filter_map(non_blank)
        .collect();
    if !location.is_empty() {
        let _ = writeln!(out, "Location: {}", location.join(", "));
    }
}

fn render_work_history(record: &ApplicationRecord, out: &mut String) {
    let _ = writeln!(out, "WORK HISTORY:");
    if record.work_history.is_empty() {
        let _ = writeln!(out, "{NONE_PROVIDED}");
        return;
    }
    for (i, job) in record.work_history.iter().enumerate() {
        let start = non_blank(job.start_date.as_deref()).unwrap_or("unknown");
        let end = non_blank(job.end_date.as_deref()).unwrap_or("present");
        let _ = writeln!(
            out,
            "{}. {} at {} ({} to {})",
            i + 1,
            job.title.trim(),
            job.employer.trim(),
            start,
            end
        );
        if let Some(resp) = non_blank(job.responsibilities.as_deref()) {
            let _ = writeln!(out, "   Responsibilities: {resp}");
        }
        if let Some(reason) = non_blank(job.reason_for_leaving.as_deref()) {
            let _ = writeln!(out, "   Reason for leaving: {reason}");
        }
    }
}

fn render_gaps(record: &ApplicationRecord, out: &mut String) {
    let _ = writeln!(out, "EMPLOYMENT GAP EXPLANATION:");
    let _ = writeln!(
        out,
        "{}",
        non_blank(record.employment_gap_explanation.as_deref()).unwrap_or(NONE_PROVIDED)
    );
}

fn render_education(record: &ApplicationRecord, out: &mut String) {
    let _ = writeln!(out, "EDUCATION:");
    if record.education.is_empty() {
        let _ = writeln!(out, "{NONE_PROVIDED}");
        return;
    }
    for edu in &record.education {
        let mut line = format!("- {}", edu.institution.trim());
        if let Some(degree) = non_blank(edu.degree.as_deref()) {
            let _ = write!(line, ", {degree}");
        }
        if let Some(field) = non_blank(edu.field_of_study.as_deref()) {
            let _ = write!(line, " in {field}");
        }
        if let Some(year) = edu.graduation_year {
            let _ = write!(line, " ({year})");
        }
        let _ = writeln!(out, "{line}");
    }
}

fn render_skills(record: &ApplicationRecord, out: &mut String) {
    let skills = &record.skills;
    let _ = writeln!(out, "PLATFORM EXPERIENCE:");
    if skills.platforms.is_empty() {
        let _ = writeln!(out, "{NONE_PROVIDED}");
    }
    for platform in &skills.platforms {
        let mut line = format!("- {}", platform.platform.trim());
        if let Some(years) = platform.years {
            let _ = write!(line, ": {years} years");
        }
        if let Some(level) = non_blank(platform.proficiency.as_deref()) {
            let _ = write!(line, " ({level})");
        }
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out, "Certifications: {}", join_or_none(&skills.certifications));
    let _ = writeln!(out, "Tools: {}", join_or_none(&skills.tools));
}

fn render_references(record: &ApplicationRecord, out: &mut String) {
    let _ = writeln!(out, "REFERENCES:");
    if record.references.is_empty() {
        let _ = writeln!(out, "{NONE_PROVIDED}");
        return;
    }
    for reference in &record.references {
        let mut line = format!("- {}", reference.name.trim());
        if let Some(rel) = non_blank(reference.relationship.as_deref()) {
            let _ = write!(line, ", {rel}");
        }
        if let Some(company) = non_blank(reference.company.as_deref()) {
            let _ = write!(line, " at {company}");
        }
        if let Some(years) = reference.years_known {
            let _ = write!(line, ", known {years} years");
        }
        let _ = writeln!(out, "{line}");
    }
}

fn render_assessment(record: &ApplicationRecord, out: &mut String) {
    let _ = writeln!(out, "ROLE ASSESSMENT ANSWERS:");
    if record.assessment_answers.is_empty() {
        let _ = writeln!(out, "{NONE_PROVIDED}");
        return;
    }
    for answer in &record.assessment_answers {
        let _ = writeln!(out, "Q: {}", answer.question.trim());
        let _ = writeln!(
            out,
            "A: {}",
            non_blank(Some(answer.answer.as_str())).unwrap_or(NONE_PROVIDED)
        );
    }
}

fn render_free_text(heading: &str, text: Option<&str>, out: &mut String) {
    let _ = writeln!(out, "{heading}:");
    let _ = writeln!(out, "{}", non_blank(text).unwrap_or(NONE_PROVIDED));
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn join_or_none(items: &[String]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        NONE_PROVIDED.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::{
        PersonalInfo, PlatformExperience, Reference, SkillsProfile, WorkHistoryEntry,
    };

    fn sample_record() -> ApplicationRecord {
        ApplicationRecord {
            personal: PersonalInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                position_applied: "Systems Engineer".to_string(),
                city: Some("London".to_string()),
                ..Default::default()
            },
            work_history: vec![WorkHistoryEntry {
                employer: "Analytical Engines Ltd".to_string(),
                title: "Engineer".to_string(),
                start_date: Some("2019-01".to_string()),
                end_date: None,
                responsibilities: Some("Designed the mill".to_string()),
                reason_for_leaving: None,
            }],
            skills: SkillsProfile {
                platforms: vec![PlatformExperience {
                    platform: "Kubernetes".to_string(),
                    years: Some(4.0),
                    proficiency: Some("advanced".to_string()),
                }],
                certifications: vec![],
                tools: vec!["Terraform".to_string()],
            },
            references: vec![Reference {
                name: "Charles Babbage".to_string(),
                relationship: Some("manager".to_string()),
                company: None,
                years_known: Some(5),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let record = sample_record();
        let sections = [RecordSection::Skills, RecordSection::WorkHistory];
        assert_eq!(
            render_sections(&record, &sections),
            render_sections(&record, &sections)
        );
    }

    #[test]
    fn test_sections_render_in_fixed_order_regardless_of_input_order() {
        let record = sample_record();
        let a = render_sections(&record, &[RecordSection::Skills, RecordSection::Position]);
        let b = render_sections(&record, &[RecordSection::Position, RecordSection::Skills]);
        assert_eq!(a, b);
        let pos = a.find("POSITION APPLIED FOR").unwrap();
        let skills = a.find("PLATFORM EXPERIENCE").unwrap();
        assert!(pos < skills);
    }

    #[test]
    fn test_only_requested_sections_are_rendered() {
        let record = sample_record();
        let text = render_sections(&record, &[RecordSection::References]);
        assert!(text.contains("Charles Babbage, manager, known 5 years"));
        assert!(!text.contains("Kubernetes"));
        assert!(!text.contains("WORK HISTORY"));
    }

    #[test]
    fn test_current_role_renders_as_present() {
        let text = render_sections(&sample_record(), &[RecordSection::WorkHistory]);
        assert!(text.contains("Engineer at Analytical Engines Ltd (2019-01 to present)"));
        assert!(text.contains("Responsibilities: Designed the mill"));
    }

    #[test]
    fn test_empty_sections_render_none_provided() {
        let text = render_sections(
            &sample_record(),
            &[RecordSection::Education, RecordSection::EmploymentGaps],
        );
        assert_eq!(text.matches(NONE_PROVIDED).count(), 2);
    }

    #[test]
    fn test_skills_render_years_proficiency_and_missing_certifications() {
        let text = render_sections(&sample_record(), &[RecordSection::Skills]);
        assert!(text.contains("- Kubernetes: 4 years (advanced)"));
        assert!(text.contains("Certifications: (none provided)"));
        assert!(text.contains("Tools: Terraform"));
    }

    #[test]
    fn test_render_full_includes_every_heading() {
        let text = render_full(&sample_record());
        for heading in [
            "POSITION APPLIED FOR",
            "WORK HISTORY",
            "EMPLOYMENT GAP EXPLANATION",
            "EDUCATION",
            "PLATFORM EXPERIENCE",
            "REFERENCES",
            "ROLE ASSESSMENT ANSWERS",
            "COVER LETTER",
            "RESUME",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
    }
}
