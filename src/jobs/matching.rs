//! Skill overlap between a candidate and a posting

use serde::Serialize;

use crate::interview::round1;
use crate::jobs::models::JobPosting;
use crate::profile::UserProfile;

/// How a candidate's skills line up with what a posting asks for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillMatch {
    /// Required skills the candidate has, in the posting's order
    pub matching: Vec<String>,
    /// Required skills the candidate lacks, in the posting's order
    pub missing: Vec<String>,
    /// Candidate skills the posting does not ask for
    pub extra: Vec<String>,
    /// Share of required skills covered; 100 when nothing is required
    pub match_percentage: f64,
}

/// Compare skill lists case-insensitively. Duplicates and blanks are ignored.
pub fn skill_match(candidate: &[String], required: &[String]) -> SkillMatch {
    let candidate = distinct(candidate);
    let required = distinct(required);

    let has = |list: &[(String, &String)], key: &str| list.iter().any(|(k, _)| k == key);

    let mut matching = Vec::new();
    let mut missing = Vec::new();
    for (key, skill) in &required {
        if has(&candidate, key) {
            matching.push((*skill).clone());
        } else {
            missing.push((*skill).clone());
        }
    }

    let extra = candidate
        .iter()
        .filter(|(key, _)| !has(&required, key))
        .map(|(_, skill)| (*skill).clone())
        .collect();

    let match_percentage = if required.is_empty() {
        100.0
    } else {
        round1(matching.len() as f64 / required.len() as f64 * 100.0)
    };

    SkillMatch {
        matching,
        missing,
        extra,
        match_percentage,
    }
}

fn distinct(skills: &[String]) -> Vec<(String, &String)> {
    let mut seen: Vec<(String, &String)> = Vec::new();
    for skill in skills {
        let key = skill.trim().to_lowercase();
        if !key.is_empty() && !seen.iter().any(|(k, _)| *k == key) {
            seen.push((key, skill));
        }
    }
    seen
}

/// A posting ranked for one candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedJob<'a> {
    pub job: &'a JobPosting,
    pub skills: SkillMatch,
}

impl JobPosting {
    pub fn skill_match(&self, profile: &UserProfile) -> SkillMatch {
        skill_match(&profile.skills, &self.skills_required)
    }
}

/// Active postings ordered by skill coverage, best first. Ties keep input order.
pub fn rank_jobs<'a>(profile: &UserProfile, jobs: &'a [JobPosting]) -> Vec<RankedJob<'a>> {
    let mut ranked: Vec<RankedJob<'a>> = jobs
        .iter()
        .filter(|job| job.is_active)
        .map(|job| RankedJob {
            job,
            skills: job.skill_match(profile),
        })
        .collect();

    ranked.sort_by(|a, b| b.skills.match_percentage.total_cmp(&a.skills.match_percentage));
    ranked
}
