//! Job posting record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

/// Where a posting was aggregated from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSource {
    Linkedin,
    Indeed,
    CompanyWebsite,
    Twitter,
    Reddit,
    #[default]
    Manual,
}

impl JobSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Indeed => "indeed",
            Self::CompanyWebsite => "company_website",
            Self::Twitter => "twitter",
            Self::Reddit => "reddit",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary_min: Option<u64>,
    #[serde(default)]
    pub salary_max: Option<u64>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub source: JobSource,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl JobPosting {
    pub fn has_salary(&self) -> bool {
        self.salary_min.is_some() || self.salary_max.is_some()
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Case-insensitive match on title, company, description and skills
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.company.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
            || self
                .skills_required
                .iter()
                .any(|s| s.to_lowercase().contains(needle_lower))
    }
}
