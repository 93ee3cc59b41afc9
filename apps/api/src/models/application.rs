use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A submitted job application, as collected by the intake wizard.
///
/// The scoring core treats this as read-only input; only `resume_text` is
/// filled in server-side (from an uploaded PDF) before scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub personal: PersonalInfo,
    #[serde(default)]
    pub work_history: Vec<WorkHistoryEntry>,
    #[serde(default)]
    pub employment_gap_explanation: Option<String>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: SkillsProfile,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub assessment_answers: Vec<AssessmentAnswer>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
}

impl ApplicationRecord {
    /// "First Last", trimmed. Empty when both parts are blank.
    pub fn candidate_name(&self) -> String {
        format!(
            "{} {}",
            self.personal.first_name.trim(),
            self.personal.last_name.trim()
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    pub position_applied: String,
    #[serde(default)]
    pub desired_start_date: Option<NaiveDate>,
    /// e.g. "full_time", "part_time", "contract"
    #[serde(default)]
    pub employment_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkHistoryEntry {
    pub employer: String,
    pub title: String,
    #[serde(default)]
    pub start_date: Option<String>,
    /// `None` for a current position.
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<String>,
    #[serde(default)]
    pub reason_for_leaving: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsProfile {
    #[serde(default)]
    pub platforms: Vec<PlatformExperience>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

/// Hands-on experience with one platform or technology.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformExperience {
    pub platform: String,
    #[serde(default)]
    pub years: Option<f32>,
    /// "beginner" | "intermediate" | "advanced" | "expert"
    #[serde(default)]
    pub proficiency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    #[serde(default)]
    pub relationship: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub years_known: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentAnswer {
    pub question: String,
    pub answer: String,
}
