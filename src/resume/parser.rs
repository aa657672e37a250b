//! Plain-text resume parsing
//!
//! Splits a resume into sections by header lines and pulls out contact
//! details, known technical skills, experience entries and certifications.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Section headers, checked in order against the start of a short line
const SECTION_HEADERS: [(&str, &str); 7] = [
    (
        "experience",
        r"(?i)^(work\s*experience|professional\s*experience|employment|work\s*history|experience)",
    ),
    ("education", r"(?i)^(education|academic|qualifications|degrees)"),
    (
        "skills",
        r"(?i)^(skills|technical\s*skills|core\s*competencies|expertise|technologies)",
    ),
    (
        "summary",
        r"(?i)^(summary|profile|objective|about\s*me|professional\s*summary)",
    ),
    (
        "certifications",
        r"(?i)^(certifications?|certificates?|licenses?|credentials)",
    ),
    ("projects", r"(?i)^(projects?|portfolio|key\s*projects)"),
    ("languages", r"(?i)^(languages?|language\s*skills)"),
];

const MAX_HEADER_LEN: usize = 50;
const MAX_EXPERIENCE_ENTRIES: usize = 5;
const MAX_CERTIFICATIONS: usize = 10;

const TECH_SKILLS: &[&str] = &[
    "python", "javascript", "typescript", "java", "c++", "c#", "go", "rust", "ruby", "php",
    "swift", "kotlin", "scala",
    "machine learning", "deep learning", "nlp", "natural language processing", "computer vision",
    "tensorflow", "pytorch", "keras", "scikit-learn", "pandas", "numpy", "opencv",
    "aws", "azure", "gcp", "google cloud", "docker", "kubernetes", "terraform", "ansible",
    "jenkins", "ci/cd", "devops",
    "sql", "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "dynamodb", "firestore",
    "cassandra",
    "react", "angular", "vue", "node.js", "express", "django", "flask", "fastapi", "spring",
    "rails",
    "openai", "langchain", "llm", "gpt", "bert", "transformers", "hugging face",
    "data science", "data engineering", "etl", "spark", "hadoop", "airflow", "kafka",
    "snowflake", "databricks",
    "git", "linux", "agile", "scrum", "rest api", "graphql", "microservices", "api design",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub dates: String,
    pub description: String,
}

/// Structured view of a resume's text
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedResume {
    pub raw_text: String,
    /// Section name to body; text before the first header lands in `header`
    pub sections: BTreeMap<String, String>,
    pub contact: ContactInfo,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub certifications: Vec<String>,
}

impl ParsedResume {
    pub fn section(&self, name: &str) -> &str {
        self.sections.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn word_count(&self) -> usize {
        self.raw_text.split_whitespace().count()
    }
}

pub struct ResumeParser {
    headers: Vec<(&'static str, Regex)>,
    skills: Vec<(&'static str, Regex)>,
    email: Regex,
    phone: Regex,
    linkedin: Regex,
    github: Regex,
    date_range: Regex,
    bullet: Regex,
}

impl ResumeParser {
    pub fn new() -> crate::Result<Self> {
        let headers = SECTION_HEADERS
            .iter()
            .map(|(name, pattern)| Ok((*name, Regex::new(pattern)?)))
            .collect::<crate::Result<Vec<_>>>()?;
        let skills = TECH_SKILLS
            .iter()
            .map(|skill| Ok((*skill, keyword_regex(skill)?)))
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(Self {
            headers,
            skills,
            email: Regex::new(r"[\w.-]+@[\w.-]+\.\w+")?,
            phone: Regex::new(r"(?:\+?\d{1,3}[-\s.]?)?\(?\d{3}\)?[-\s.]?\d{3}[-\s.]?\d{4}\b")?,
            linkedin: Regex::new(r"(?i)linkedin\.com/in/[\w-]+")?,
            github: Regex::new(r"(?i)github\.com/[\w-]+")?,
            date_range: Regex::new(
                r"(?i)((?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s*\d{4}|\d{4})\s*(?:[-–—]+|to)\s*((?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s*\d{4}|\d{4}|present|current)",
            )?,
            bullet: Regex::new(r"^[•\-*→]\s*")?,
        })
    }

    pub fn parse(&self, text: &str) -> ParsedResume {
        let sections = self.sections(text);
        let experience = self.experience(sections.get("experience").map_or("", String::as_str));
        let certifications =
            self.certifications(sections.get("certifications").map_or("", String::as_str));

        ParsedResume {
            raw_text: text.to_string(),
            contact: self.contact(text),
            skills: self.skills(text),
            sections,
            experience,
            certifications,
        }
    }

    fn sections(&self, text: &str) -> BTreeMap<String, String> {
        let mut sections = BTreeMap::new();
        let mut current = "header";
        let mut body: Vec<&str> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            let header = (trimmed.len() < MAX_HEADER_LEN)
                .then(|| {
                    self.headers
                        .iter()
                        .find(|(_, pattern)| pattern.is_match(trimmed))
                        .map(|(name, _)| *name)
                })
                .flatten();

            match header {
                Some(name) => {
                    if !body.is_empty() {
                        sections.insert(current.to_string(), body.join("\n"));
                    }
                    current = name;
                    body.clear();
                }
                None => body.push(line),
            }
        }

        if !body.is_empty() {
            sections.insert(current.to_string(), body.join("\n"));
        }
        sections
    }

    fn contact(&self, text: &str) -> ContactInfo {
        let found = |re: &Regex| re.find(text).map(|m| m.as_str().to_string());
        ContactInfo {
            email: found(&self.email),
            phone: found(&self.phone),
            linkedin: found(&self.linkedin).map(|m| format!("https://{}", m)),
            github: found(&self.github).map(|m| format!("https://{}", m)),
        }
    }

    fn skills(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.skills
            .iter()
            .filter(|(_, pattern)| pattern.is_match(&lower))
            .map(|(skill, _)| display_skill(skill))
            .collect()
    }

    fn experience(&self, section: &str) -> Vec<ExperienceEntry> {
        let mut entries: Vec<ExperienceEntry> = Vec::new();
        let mut description: Vec<&str> = Vec::new();

        for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let dates = self.date_range.find(line).map(|m| m.as_str().to_string());
            let looks_like_title = line.len() < 100
                && line.chars().take(20).any(|c| c.is_uppercase());

            if dates.is_some() || looks_like_title {
                if let Some(last) = entries.last_mut() {
                    last.description = description.join(" ");
                }
                description.clear();
                let title = line.split('|').next().unwrap_or(line).trim().to_string();
                entries.push(ExperienceEntry {
                    title,
                    dates: dates.unwrap_or_default(),
                    description: String::new(),
                });
            } else if !entries.is_empty() {
                description.push(line);
            }
        }

        if let Some(last) = entries.last_mut() {
            last.description = description.join(" ");
        }
        entries.truncate(MAX_EXPERIENCE_ENTRIES);
        entries
    }

    fn certifications(&self, section: &str) -> Vec<String> {
        section
            .lines()
            .map(str::trim)
            .filter(|line| line.len() > 5 && line.len() < 150)
            .map(|line| self.bullet.replace(line, "").trim().to_string())
            .filter(|line| !line.is_empty())
            .take(MAX_CERTIFICATIONS)
            .collect()
    }
}

/// Case-insensitive whole-term match that also works for terms like `c++`
pub(crate) fn keyword_regex(keyword: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?i)(?:^|[^\w]){}(?:$|[^\w])",
        regex::escape(&keyword.to_lowercase())
    ))
}

/// Short skills read as acronyms, longer ones in title case
fn display_skill(skill: &str) -> String {
    if skill.len() <= 3 {
        return skill.to_uppercase();
    }

    let mut out = String::with_capacity(skill.len());
    let mut start_of_word = true;
    for c in skill.chars() {
        if c.is_alphabetic() {
            if start_of_word {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            start_of_word = false;
        } else {
            out.push(c);
            start_of_word = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\
Ada Lovelace
ada@example.com | (555) 123-4567 | linkedin.com/in/ada-l | github.com/ada
Summary
Backend engineer focused on Rust and PostgreSQL.
Experience
Senior Engineer | Ferrous Systems  Jan 2020 - Present
built a storage engine and reduced latency by 40%
Engineer | Numbers Inc  2016 - 2019
maintained etl jobs in python
Education
B.S. Computer Science, 2016
Certifications
- AWS Certified Solutions Architect
- CKA
";

    fn parsed() -> ParsedResume {
        ResumeParser::new().unwrap().parse(RESUME)
    }

    #[test]
    fn sections_split_on_headers() {
        let resume = parsed();
        let names: Vec<&str> = resume.sections.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["certifications", "education", "experience", "header", "summary"]
        );
        assert!(resume.section("summary").contains("Backend engineer"));
        assert_eq!(resume.section("projects"), "");
    }

    #[test]
    fn contact_details_are_found() {
        let contact = parsed().contact;
        assert_eq!(contact.email.as_deref(), Some("ada@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("(555) 123-4567"));
        assert_eq!(contact.linkedin.as_deref(), Some("https://linkedin.com/in/ada-l"));
        assert_eq!(contact.github.as_deref(), Some("https://github.com/ada"));
    }

    #[test]
    fn years_alone_are_not_a_phone_number() {
        let resume = ResumeParser::new().unwrap().parse("Engineer 2016 - 2019");
        assert!(resume.contact.phone.is_none());
    }

    #[test]
    fn known_skills_are_detected_with_display_names() {
        let skills = parsed().skills;
        assert!(skills.contains(&"Python".to_string()));
        assert!(skills.contains(&"Rust".to_string()));
        assert!(skills.contains(&"Postgresql".to_string()));
        assert!(skills.contains(&"AWS".to_string()));
        assert!(skills.contains(&"ETL".to_string()));
        assert!(!skills.contains(&"Java".to_string()));
    }

    #[test]
    fn symbol_skills_match_as_whole_terms() {
        let parser = ResumeParser::new().unwrap();
        let skills = parser.parse("Shipped C++ services with CI/CD.").skills;
        assert!(skills.contains(&"C++".to_string()));
        assert!(skills.contains(&"Ci/Cd".to_string()));
        assert!(!skills.contains(&"C#".to_string()));
    }

    #[test]
    fn experience_entries_keep_titles_and_dates() {
        let entries = parsed().experience;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Senior Engineer");
        assert_eq!(entries[0].dates, "Jan 2020 - Present");
        assert!(entries[0].description.contains("40%"));
        assert_eq!(entries[1].dates, "2016 - 2019");
    }

    #[test]
    fn certifications_drop_bullets_and_short_lines() {
        assert_eq!(
            parsed().certifications,
            vec!["AWS Certified Solutions Architect"]
        );
    }
}
