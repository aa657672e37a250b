//! Applicant-tracking-system style scoring of a parsed resume
//!
//! Weights: format 20%, keywords 35%, experience 30%, education 15%.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::interview::round1;
use crate::jobs::{skill_match, JobPosting, SkillMatch};
use crate::resume::parser::{keyword_regex, ParsedResume};

const ATS_KEYWORDS: &[&str] = &[
    // ai / ml
    "machine learning", "deep learning", "neural networks", "nlp", "computer vision",
    "tensorflow", "pytorch", "scikit-learn", "data science", "ai", "artificial intelligence",
    "llm", "transformers", "bert", "gpt", "langchain", "rag",
    // cloud
    "aws", "azure", "gcp", "cloud", "ec2", "s3", "lambda", "kubernetes", "docker", "terraform",
    "serverless", "microservices",
    // programming
    "python", "javascript", "java", "c++", "go", "rust", "typescript", "sql", "api", "rest",
    "graphql",
    // soft skills
    "leadership", "communication", "teamwork", "problem-solving", "analytical",
    "project management", "agile", "scrum", "collaboration",
    // data
    "nosql", "mongodb", "postgresql", "data analysis", "etl", "data pipeline", "spark", "hadoop",
    "kafka",
    // devops
    "ci/cd", "jenkins", "github actions", "devops", "automation", "monitoring", "logging",
    "infrastructure as code",
];

const ACTION_VERBS: &[&str] = &[
    "achieved", "improved", "developed", "created", "implemented", "designed", "led", "managed",
    "increased", "reduced", "optimized", "built", "launched", "delivered", "established",
    "streamlined", "automated", "architected", "engineered", "spearheaded", "transformed",
];

const RELEVANT_FIELDS: &[&str] = &[
    "computer science", "engineering", "data science", "mathematics", "physics",
    "information technology",
];

const ESSENTIAL_SECTIONS: [&str; 3] = ["experience", "education", "skills"];

const MAX_MISSING_KEYWORDS: usize = 15;
const MAX_STRENGTHS: usize = 6;
const MAX_WEAKNESSES: usize = 5;
const MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionQuality {
    Good,
    NeedsImprovement,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionReport {
    pub present: bool,
    pub word_count: usize,
    pub quality: SectionQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtsAnalysis {
    pub overall_score: f64,
    pub format_score: f64,
    pub keyword_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub keyword_matches: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub sections: BTreeMap<String, SectionReport>,
}

/// How a resume reads against one posting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobFit {
    pub match_score: f64,
    pub skills: SkillMatch,
    pub verdict: &'static str,
    pub recommendations: Vec<String>,
}

pub struct ResumeAnalyzer {
    default_keywords: Vec<(String, Regex)>,
    bullet: Regex,
    achievement: Regex,
    percentage: Regex,
    money_or_percentage: Regex,
    year_digits: Regex,
    degree: Regex,
    graduation_year: Regex,
    gpa: Regex,
    word: Regex,
}

impl ResumeAnalyzer {
    pub fn new() -> crate::Result<Self> {
        let mut seen = BTreeSet::new();
        let default_keywords = ATS_KEYWORDS
            .iter()
            .filter(|k| seen.insert(**k))
            .map(|k| Ok((k.to_string(), keyword_regex(k)?)))
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(Self {
            default_keywords,
            bullet: Regex::new(r"[•\-*]")?,
            achievement: Regex::new(r"\d+%|\$\d+|\d+\+")?,
            percentage: Regex::new(r"\d+%")?,
            money_or_percentage: Regex::new(r"\d+%|\$\d+")?,
            year_digits: Regex::new(r"\d{4}")?,
            degree: Regex::new(
                r"(?i)\b(?:bachelor|master|mba|ph\.?d|doctorate|b\.?s\b|b\.?a\b|m\.?s\b|m\.?a\b)",
            )?,
            graduation_year: Regex::new(r"\b(?:19|20)\d{2}\b")?,
            gpa: Regex::new(r"(?i)gpa[:\s]*([0-9]\.[0-9]+)")?,
            word: Regex::new(r"\w+")?,
        })
    }

    /// Score a resume, optionally against caller-chosen keywords instead of the
    /// built-in list
    pub fn analyze(&self, resume: &ParsedResume, target_keywords: &[String]) -> crate::Result<AtsAnalysis> {
        let lower = resume.raw_text.to_lowercase();

        let (matches, missing) = if target_keywords.is_empty() {
            partition_keywords(&lower, self.default_keywords.iter().map(|(k, re)| (k.clone(), re)))
        } else {
            let compiled = distinct_keywords(target_keywords)
                .into_iter()
                .map(|k| {
                    let re = keyword_regex(&k)?;
                    Ok((k, re))
                })
                .collect::<crate::Result<Vec<_>>>()?;
            partition_keywords(&lower, compiled.iter().map(|(k, re)| (k.clone(), re)))
        };

        let format_score = self.format_score(resume);
        let keyword_score = keyword_score(&lower, matches.len(), matches.len() + missing.len());
        let experience_score = self.experience_score(resume);
        let education_score = self.education_score(resume);

        let overall_score = format_score * 0.2
            + keyword_score * 0.35
            + experience_score * 0.30
            + education_score * 0.15;

        Ok(AtsAnalysis {
            overall_score: round1(overall_score),
            format_score: round1(format_score),
            keyword_score: round1(keyword_score),
            experience_score: round1(experience_score),
            education_score: round1(education_score),
            strengths: self.strengths(resume, &matches),
            weaknesses: self.weaknesses(resume, &missing),
            suggestions: self.suggestions(resume, &missing, format_score),
            sections: section_reports(resume),
            keyword_matches: matches,
            missing_keywords: missing.into_iter().take(MAX_MISSING_KEYWORDS).collect(),
        })
    }

    /// Skill coverage plus vocabulary overlap with the posting's description
    pub fn job_fit(&self, resume: &ParsedResume, job: &JobPosting) -> JobFit {
        let skills = skill_match(&resume.skills, &job.skills_required);
        let required = skills.matching.len() + skills.missing.len();
        let skill_ratio = if required == 0 {
            0.5
        } else {
            skills.matching.len() as f64 / required as f64
        };

        let job_words = self.words(&job.description);
        let resume_words = self.words(&resume.raw_text);
        let overlap = if job_words.is_empty() {
            0.0
        } else {
            job_words.intersection(&resume_words).count() as f64 / job_words.len() as f64
        };

        let match_score = skill_ratio * 60.0 + overlap * 40.0;
        let verdict = if match_score >= 80.0 {
            "Excellent match - your experience aligns well with this role"
        } else if match_score >= 60.0 {
            "Good match - you have most required qualifications"
        } else if match_score >= 40.0 {
            "Partial match - consider highlighting transferable skills"
        } else {
            "Limited match - this role may require additional skills"
        };

        let mut recommendations = Vec::new();
        if !skills.missing.is_empty() {
            let top: Vec<&str> = skills.missing.iter().take(3).map(String::as_str).collect();
            recommendations.push(format!("Consider gaining experience in: {}", top.join(", ")));
        }
        if match_score < 70.0 {
            recommendations
                .push("Tailor your resume to highlight relevant experience for this role".to_string());
        }
        if skill_ratio < 0.5 {
            recommendations.push("Focus on acquiring the missing technical skills".to_string());
        }

        JobFit {
            match_score: round1(match_score),
            skills,
            verdict,
            recommendations,
        }
    }

    fn format_score(&self, resume: &ParsedResume) -> f64 {
        let mut score = 50.0;

        score += 10.0 * ESSENTIAL_SECTIONS
            .iter()
            .filter(|s| resume.has_section(s))
            .count() as f64;

        let contact = &resume.contact;
        for present in [contact.email.is_some(), contact.phone.is_some(), contact.linkedin.is_some()] {
            if present {
                score += 5.0;
            }
        }

        let words = resume.word_count();
        if (300..=1500).contains(&words) {
            score += 10.0;
        } else if words < 200 {
            score -= 10.0;
        }

        if self.bullet.find_iter(&resume.raw_text).count() >= 5 {
            score += 5.0;
        }

        f64::min(score, 100.0)
    }

    fn experience_score(&self, resume: &ParsedResume) -> f64 {
        let section = resume.section("experience");
        if section.is_empty() {
            return 30.0;
        }

        let mut score = 40.0;
        score += f64::min(self.achievement.find_iter(section).count() as f64 * 5.0, 20.0);
        score += f64::min(action_verb_count(&section.to_lowercase()) as f64 * 3.0, 15.0);

        let entries = resume.experience.len();
        if entries >= 2 {
            score += 10.0;
        }
        if entries >= 4 {
            score += 5.0;
        }

        if self.year_digits.find_iter(section).count() >= 2 {
            score += 10.0;
        }

        f64::min(score, 100.0)
    }

    fn education_score(&self, resume: &ParsedResume) -> f64 {
        let section = resume.section("education");
        if section.is_empty() {
            return 40.0;
        }

        let lower = section.to_lowercase();
        let mut score = 50.0;
        if self.degree.is_match(&lower) {
            score += 15.0;
        }
        if RELEVANT_FIELDS.iter().any(|field| lower.contains(field)) {
            score += 10.0;
        }
        if self.graduation_year.is_match(section) {
            score += 10.0;
        }
        let high_gpa = self
            .gpa
            .captures(&lower)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .is_some_and(|gpa| gpa >= 3.5);
        if high_gpa {
            score += 10.0;
        }

        f64::min(score, 100.0)
    }

    fn strengths(&self, resume: &ParsedResume, matches: &[String]) -> Vec<String> {
        let mut strengths = Vec::new();
        if matches.len() >= 10 {
            strengths.push(format!(
                "Strong keyword presence with {} relevant skills identified",
                matches.len()
            ));
        }
        if resume.skills.len() >= 8 {
            strengths.push(format!(
                "Comprehensive skills section with {} technical skills",
                resume.skills.len()
            ));
        }
        if resume.contact.linkedin.is_some() {
            strengths.push("Professional LinkedIn profile included".to_string());
        }
        if resume.contact.github.is_some() {
            strengths.push("GitHub profile demonstrates coding activity".to_string());
        }
        if self.percentage.is_match(resume.section("experience")) {
            strengths.push("Quantifiable achievements with metrics".to_string());
        }
        if resume.experience.len() >= 3 {
            strengths.push("Solid work history with multiple positions".to_string());
        }
        if !resume.certifications.is_empty() {
            strengths.push(format!(
                "{} professional certifications",
                resume.certifications.len()
            ));
        }
        strengths.truncate(MAX_STRENGTHS);
        strengths
    }

    fn weaknesses(&self, resume: &ParsedResume, missing: &[String]) -> Vec<String> {
        let mut weaknesses = Vec::new();
        if missing.len() > 20 {
            weaknesses.push("Missing many industry-standard keywords".to_string());
        }
        if resume.contact.linkedin.is_none() {
            weaknesses.push("No LinkedIn profile URL".to_string());
        }
        if resume.skills.len() < 5 {
            weaknesses.push("Skills section could be more comprehensive".to_string());
        }
        if !self.money_or_percentage.is_match(resume.section("experience")) {
            weaknesses.push("Lack of quantifiable achievements and metrics".to_string());
        }
        let words = resume.word_count();
        if words < 300 {
            weaknesses.push("Resume may be too brief - consider adding more detail".to_string());
        } else if words > 1500 {
            weaknesses.push("Resume may be too long - consider condensing".to_string());
        }
        if !resume.has_section("summary") {
            weaknesses.push("Missing professional summary section".to_string());
        }
        weaknesses.truncate(MAX_WEAKNESSES);
        weaknesses
    }

    fn suggestions(&self, resume: &ParsedResume, missing: &[String], format_score: f64) -> Vec<String> {
        let mut suggestions = Vec::new();
        if !missing.is_empty() {
            let top: Vec<&str> = missing.iter().take(5).map(String::as_str).collect();
            suggestions.push(format!("Add these high-impact keywords: {}", top.join(", ")));
        }
        if format_score < 70.0 {
            suggestions
                .push("Improve formatting with clear section headers and bullet points".to_string());
        }
        if resume.contact.linkedin.is_none() {
            suggestions.push("Add your LinkedIn profile URL to increase credibility".to_string());
        }
        if resume.contact.github.is_none() {
            suggestions.push("Include GitHub profile to showcase your code".to_string());
        }
        if !self.percentage.is_match(resume.section("experience")) {
            suggestions.push(
                "Add quantifiable achievements (e.g., 'Improved performance by 40%')".to_string(),
            );
        }
        if action_verb_count(&resume.raw_text.to_lowercase()) < 5 {
            suggestions.push(
                "Use more action verbs like 'achieved', 'implemented', 'optimized'".to_string(),
            );
        }
        if resume.skills.len() < 8 {
            suggestions
                .push("Expand your skills section with more technical competencies".to_string());
        }
        if !resume.has_section("summary") {
            suggestions.push(
                "Add a professional summary at the top highlighting your key qualifications"
                    .to_string(),
            );
        }
        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }

    fn words(&self, text: &str) -> BTreeSet<String> {
        self.word
            .find_iter(&text.to_lowercase())
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

fn partition_keywords<'a>(
    text: &str,
    keywords: impl Iterator<Item = (String, &'a Regex)>,
) -> (Vec<String>, Vec<String>) {
    let mut matches = Vec::new();
    let mut missing = Vec::new();
    for (keyword, pattern) in keywords {
        if pattern.is_match(text) {
            matches.push(keyword);
        } else {
            missing.push(keyword);
        }
    }
    (matches, missing)
}

fn distinct_keywords(keywords: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty() && seen.insert(k.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn keyword_score(text_lower: &str, matched: usize, checked: usize) -> f64 {
    let ratio = if checked == 0 {
        0.5
    } else {
        matched as f64 / checked as f64
    };
    let verb_bonus = f64::min(action_verb_count(text_lower) as f64 * 2.0, 20.0);
    f64::min(ratio * 80.0 + verb_bonus, 100.0)
}

fn action_verb_count(text_lower: &str) -> usize {
    ACTION_VERBS.iter().filter(|verb| text_lower.contains(*verb)).count()
}

fn section_reports(resume: &ParsedResume) -> BTreeMap<String, SectionReport> {
    let mut reports: BTreeMap<String, SectionReport> = resume
        .sections
        .iter()
        .map(|(name, body)| {
            let word_count = body.split_whitespace().count();
            let quality = if word_count > 50 {
                SectionQuality::Good
            } else {
                SectionQuality::NeedsImprovement
            };
            (
                name.clone(),
                SectionReport {
                    present: true,
                    word_count,
                    quality,
                },
            )
        })
        .collect();

    for name in ESSENTIAL_SECTIONS {
        reports.entry(name.to_string()).or_insert(SectionReport {
            present: false,
            word_count: 0,
            quality: SectionQuality::Missing,
        });
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::parser::ResumeParser;

    const RESUME: &str = "\
Ada Lovelace
ada@example.com | (555) 123-4567 | linkedin.com/in/ada-l
Summary
Backend engineer focused on Rust and PostgreSQL.
Experience
Senior Engineer | Ferrous Systems  Jan 2020 - Present
built a storage engine and reduced latency by 40%
Engineer | Numbers Inc  2016 - 2019
maintained etl jobs in python
Education
B.S. Computer Science, 2016, GPA: 3.8
Skills
- Rust
- Python
";

    fn analyzer() -> ResumeAnalyzer {
        ResumeAnalyzer::new().unwrap()
    }

    fn parse(text: &str) -> ParsedResume {
        ResumeParser::new().unwrap().parse(text)
    }

    #[test]
    fn component_scores_follow_the_rubric() {
        let analysis = analyzer().analyze(&parse(RESUME), &[]).unwrap();

        // 50 + 3 sections + email, phone, linkedin + dashes as bullets - brevity
        assert_eq!(analysis.format_score, 90.0);
        // 40 + one achievement + 2 verbs (built, reduced) + 2 entries + years
        assert_eq!(analysis.experience_score, 71.0);
        // 50 + degree + field + year + gpa
        assert_eq!(analysis.education_score, 95.0);
        assert_eq!(
            analysis.overall_score,
            round1(
                analysis.format_score * 0.2
                    + analysis.keyword_score * 0.35
                    + analysis.experience_score * 0.30
                    + analysis.education_score * 0.15
            )
        );
    }

    #[test]
    fn missing_sections_take_fixed_scores() {
        let analysis = analyzer().analyze(&parse("just a few words"), &[]).unwrap();
        assert_eq!(analysis.experience_score, 30.0);
        assert_eq!(analysis.education_score, 40.0);
        assert_eq!(analysis.format_score, 40.0);
        assert_eq!(analysis.sections["experience"].quality, SectionQuality::Missing);
        assert!(!analysis.sections["skills"].present);
        assert_eq!(analysis.missing_keywords.len(), MAX_MISSING_KEYWORDS);
    }

    #[test]
    fn target_keywords_replace_the_default_list() {
        let keywords: Vec<String> = ["Rust", "rust", "Kafka", "PostgreSQL", " "]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let analysis = analyzer().analyze(&parse(RESUME), &keywords).unwrap();

        assert_eq!(analysis.keyword_matches, vec!["Rust", "PostgreSQL"]);
        assert_eq!(analysis.missing_keywords, vec!["Kafka"]);
        // 2 of 3 keywords, plus 2 action verbs
        assert_eq!(analysis.keyword_score, round1(2.0 / 3.0 * 80.0 + 4.0));
    }

    #[test]
    fn insights_are_capped_and_specific() {
        let analysis = analyzer().analyze(&parse(RESUME), &[]).unwrap();

        assert!(analysis.strengths.contains(&"Professional LinkedIn profile included".to_string()));
        assert!(analysis.strengths.contains(&"Quantifiable achievements with metrics".to_string()));
        assert!(analysis
            .suggestions
            .contains(&"Include GitHub profile to showcase your code".to_string()));
        assert!(!analysis
            .weaknesses
            .contains(&"Missing professional summary section".to_string()));
        assert!(analysis.strengths.len() <= MAX_STRENGTHS);
        assert!(analysis.weaknesses.len() <= MAX_WEAKNESSES);
        assert!(analysis.suggestions.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn job_fit_combines_skills_and_vocabulary() {
        let job: JobPosting = serde_json::from_value(serde_json::json!({
            "id": "j1",
            "title": "Rust Engineer",
            "company": "Ferrous",
            "description": "storage engine latency",
            "skills_required": ["Rust", "Kafka"],
        }))
        .unwrap();

        let fit = analyzer().job_fit(&parse(RESUME), &job);
        assert_eq!(fit.skills.matching, vec!["Rust"]);
        assert_eq!(fit.skills.missing, vec!["Kafka"]);
        // half the skills, every description word present
        assert_eq!(fit.match_score, 70.0);
        assert_eq!(fit.verdict, "Good match - you have most required qualifications");
        assert_eq!(fit.recommendations, vec!["Consider gaining experience in: Kafka"]);
    }
}
