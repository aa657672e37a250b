//! User profile record

use serde::{Deserialize, Serialize};

/// Weight of each populated field in the completion percentage
const COMPLETION_WEIGHTS: Completion = Completion {
    name: 15,
    email: 15,
    title: 20,
    location: 10,
    skills: 20,
    specializations: 15,
    resume: 5,
};

struct Completion {
    name: u8,
    email: u8,
    title: u8,
    location: u8,
    skills: u8,
    specializations: u8,
    resume: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Current or desired job title
    pub title: String,
    pub location: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub specializations: Vec<String>,
    pub resume_url: Option<String>,
    pub experience_years: Option<u32>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

impl UserProfile {
    /// Weighted share of populated fields, 0-100
    pub fn completion(&self) -> u8 {
        let w = &COMPLETION_WEIGHTS;
        let filled = |s: &str| !s.trim().is_empty();

        [
            (filled(&self.name), w.name),
            (filled(&self.email), w.email),
            (filled(&self.title), w.title),
            (filled(&self.location), w.location),
            (!self.skills.is_empty(), w.skills),
            (!self.specializations.is_empty(), w.specializations),
            (self.resume_url.as_deref().is_some_and(filled), w.resume),
        ]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, weight)| weight)
        .sum()
    }

    /// Names of fields that still count against completion
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.location.trim().is_empty() {
            missing.push("location");
        }
        if self.skills.is_empty() {
            missing.push("skills");
        }
        if self.specializations.is_empty() {
            missing.push("specializations");
        }
        if !self.resume_url.as_deref().is_some_and(|r| !r.trim().is_empty()) {
            missing.push("resume");
        }
        missing
    }
}

/// Partial update; `None` leaves the field alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub specializations: Option<Vec<String>>,
    pub resume_url: Option<String>,
    pub experience_years: Option<u32>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

impl ProfilePatch {
    pub fn apply(self, profile: &mut UserProfile) {
        if let Some(v) = self.name {
            profile.name = v;
        }
        if let Some(v) = self.email {
            profile.email = v;
        }
        if let Some(v) = self.title {
            profile.title = v;
        }
        if let Some(v) = self.location {
            profile.location = v;
        }
        if let Some(v) = self.bio {
            profile.bio = v;
        }
        if let Some(v) = self.skills {
            profile.skills = v;
        }
        if let Some(v) = self.specializations {
            profile.specializations = v;
        }
        if let Some(v) = self.resume_url {
            profile.resume_url = Some(v);
        }
        if let Some(v) = self.experience_years {
            profile.experience_years = Some(v);
        }
        if let Some(v) = self.linkedin_url {
            profile.linkedin_url = Some(v);
        }
        if let Some(v) = self.github_url {
            profile.github_url = Some(v);
        }
    }
}
