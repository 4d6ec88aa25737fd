use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Upper bound on the tags a company can attach to a posting.
pub const MAX_SKILLS: usize = 10;

/// Discriminant carried as `type` in every outbound envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Company,
    Employee,
}

impl FormKind {
    pub const fn label(self) -> &'static str {
        match self {
            FormKind::Company => "company",
            FormKind::Employee => "employee",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownOption::new("skill level", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    Remote,
    Hybrid,
    #[serde(rename = "On-site")]
    OnSite,
}

impl JobType {
    pub const ALL: [JobType; 3] = [JobType::Remote, JobType::Hybrid, JobType::OnSite];

    pub const fn label(self) -> &'static str {
        match self {
            JobType::Remote => "Remote",
            JobType::Hybrid => "Hybrid",
            JobType::OnSite => "On-site",
        }
    }
}

impl FromStr for JobType {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(JobType::Remote),
            "hybrid" => Ok(JobType::Hybrid),
            "on-site" | "onsite" | "on_site" => Ok(JobType::OnSite),
            _ => Err(UnknownOption::new("job type", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} '{value}'")]
pub struct UnknownOption {
    pub field: &'static str,
    pub value: String,
}

impl UnknownOption {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// Job posting submitted by a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyApplication {
    pub company_name: String,
    pub company_email: String,
    pub role: String,
    pub skills: Vec<String>,
    pub skill_level: SkillLevel,
    pub education_level: String,
    pub country: String,
    pub job_type: JobType,
}

impl Default for CompanyApplication {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            company_email: String::new(),
            role: String::new(),
            skills: vec!["React".to_string(), "TypeScript".to_string()],
            skill_level: SkillLevel::Intermediate,
            education_level: String::new(),
            country: "United States".to_string(),
            job_type: JobType::Remote,
        }
    }
}

impl CompanyApplication {
    /// Add a trimmed tag. Blank input, duplicates and a full list are ignored.
    pub fn add_skill(&mut self, raw: &str) -> bool {
        let skill = raw.trim();
        if skill.is_empty() || self.skills.len() >= MAX_SKILLS {
            return false;
        }
        if self.skills.iter().any(|existing| existing == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, index: usize) -> Option<String> {
        (index < self.skills.len()).then(|| self.skills.remove(index))
    }

    /// Backspace on an empty tag input drops the most recent tag.
    pub fn pop_skill(&mut self) -> Option<String> {
        self.skills.pop()
    }

    pub fn skills_remaining(&self) -> usize {
        MAX_SKILLS.saturating_sub(self.skills.len())
    }
}

/// Application submitted by an individual applicant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeApplication {
    pub full_name: String,
    pub email: String,
    /// Empty means the applicant left it blank.
    pub phone: String,
    pub skill_level: SkillLevel,
    #[serde(skip)]
    pub resume: Option<ResumeAttachment>,
}

/// Uploaded resume already checked against the upload policy.
#[derive(Clone, PartialEq, Eq)]
pub struct ResumeAttachment {
    pub file_name: String,
    pub mime_type: String,
    /// Declared size in bytes.
    pub size: u64,
    pub content: Bytes,
}

impl fmt::Debug for ResumeAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeAttachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// A single submission, one of the two form shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Application {
    Company(CompanyApplication),
    Employee(EmployeeApplication),
}

impl Application {
    pub fn kind(&self) -> FormKind {
        match self {
            Application::Company(_) => FormKind::Company,
            Application::Employee(_) => FormKind::Employee,
        }
    }

    pub fn resume(&self) -> Option<&ResumeAttachment> {
        match self {
            Application::Employee(employee) => employee.resume.as_ref(),
            Application::Company(_) => None,
        }
    }
}

impl From<CompanyApplication> for Application {
    fn from(value: CompanyApplication) -> Self {
        Application::Company(value)
    }
}

impl From<EmployeeApplication> for Application {
    fn from(value: EmployeeApplication) -> Self {
        Application::Employee(value)
    }
}
