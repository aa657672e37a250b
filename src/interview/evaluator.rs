//! Heuristic scoring of interview answers
//!
//! Weights: STAR structure 30%, category relevance 25%, communication 20%,
//! depth 25%. Deterministic for a given question and answer.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::interview::models::{Difficulty, InterviewQuestion};
use crate::interview::round1;

const STAR_INDICATORS: [(&str, &[&str]); 4] = [
    (
        "situation",
        &["situation", "context", "background", "scenario", "when", "while working"],
    ),
    (
        "task",
        &["task", "goal", "objective", "responsible", "challenge", "needed to", "had to"],
    ),
    (
        "action",
        &["action", "decided", "implemented", "created", "developed", "led", "initiated", "took"],
    ),
    (
        "result",
        &["result", "outcome", "achieved", "improved", "increased", "reduced", "successfully", "learned"],
    ),
];

const POSITIVE_WORDS: &[&str] = &[
    "achieved", "accomplished", "improved", "increased", "reduced", "saved", "led", "managed",
    "developed", "created", "implemented", "designed", "collaborated", "coordinated", "delivered",
    "exceeded", "optimized",
];

const TECHNICAL_WORDS: &[&str] = &[
    "algorithm", "architecture", "database", "api", "framework", "library", "performance",
    "scalability", "security", "testing", "deployment", "optimization", "integration",
    "automation", "monitoring",
];

const EXAMPLE_MARKERS: &[&str] = &["for example", "specifically", "in particular", "such as", "instance"];

const ACTION_VERBS: &[&str] = &["led", "managed", "developed", "created", "implemented", "achieved"];

fn expected_topics(category: &str) -> &'static [&'static str] {
    match category {
        "teamwork" => &["collaboration", "team", "together", "communication", "support", "helped"],
        "leadership" => &["led", "managed", "directed", "mentored", "guided", "decision", "responsibility"],
        "problem_solving" => &["problem", "solution", "analyzed", "identified", "resolved", "fixed", "approach"],
        "time_management" => &["deadline", "prioritized", "organized", "schedule", "time", "efficient"],
        "conflict" => &["disagreement", "resolved", "compromise", "mediated", "understood", "perspective"],
        "achievement" => &["achieved", "accomplished", "proud", "success", "impact", "result"],
        "failure" => &["failed", "mistake", "learned", "improved", "changed", "growth"],
        "technical" | "system_design" => &["implemented", "designed", "built", "developed", "architecture", "system"],
        "communication" => &["explained", "presented", "communicated", "stakeholder", "audience"],
        _ => &[],
    }
}

/// Component scores and coaching notes for one answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEvaluation {
    pub score: f64,
    pub star_score: f64,
    pub relevance_score: f64,
    pub communication_score: f64,
    pub depth_score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub feedback: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl PerformanceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::Excellent
        } else if score >= 70.0 {
            Self::Good
        } else if score >= 55.0 {
            Self::Average
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ResponseEvaluator {
    metric: Regex,
    quantified: Regex,
    team_metric: Regex,
    sentence_break: Regex,
    filler: Regex,
}

impl ResponseEvaluator {
    pub fn new() -> crate::Result<Self> {
        Ok(Self {
            metric: Regex::new(r"\d+%|\$\d+|\d+\s*(people|team|months|years|days)")?,
            quantified: Regex::new(r"\d+%|\$\d+")?,
            team_metric: Regex::new(r"\d+%|\$\d+|\d+\s*(people|team)")?,
            sentence_break: Regex::new(r"[.!?]+")?,
            filler: Regex::new(r"\b(um|uh|like|basically|actually|literally)\b")?,
        })
    }

    pub fn evaluate(&self, question: &InterviewQuestion, answer: &str) -> ResponseEvaluation {
        let lower = answer.to_lowercase();
        let word_count = answer.split_whitespace().count();

        let star = star_score(&lower);
        let relevance = relevance_score(&lower, &question.category);
        let communication = self.communication_score(&lower, word_count);
        let depth = self.depth_score(&lower, word_count, question.difficulty);

        let mut score = star * 0.30 + relevance * 0.25 + communication * 0.20 + depth * 0.25;
        match question.difficulty {
            Difficulty::Hard if score >= 60.0 => score = (score + 5.0).min(100.0),
            Difficulty::Easy if score >= 80.0 => score -= 5.0,
            _ => {}
        }

        let strengths = self.strengths(&lower, star, word_count);
        let improvements = self.improvements(&lower, star, word_count, &question.category);
        let feedback = answer_feedback(score, &strengths, &improvements);

        ResponseEvaluation {
            score: round1(score),
            star_score: round1(star),
            relevance_score: round1(relevance),
            communication_score: round1(communication),
            depth_score: round1(depth),
            strengths,
            improvements,
            feedback,
        }
    }

    fn communication_score(&self, lower: &str, word_count: usize) -> f64 {
        let mut score = 50.0;

        score += match word_count {
            100..=300 => 20.0,
            50..=99 | 301..=400 => 10.0,
            0..=49 => -10.0,
            _ => 0.0,
        };

        let sentences = self
            .sentence_break
            .split(lower)
            .filter(|s| !s.trim().is_empty())
            .count();
        if sentences >= 3 {
            score += 10.0;
        }

        score += (count_present(lower, POSITIVE_WORDS) as f64 * 3.0).min(15.0);

        let fillers: BTreeSet<&str> = self.filler.find_iter(lower).map(|m| m.as_str()).collect();
        score -= fillers.len() as f64 * 2.0;

        score.clamp(0.0, 100.0)
    }

    fn depth_score(&self, lower: &str, word_count: usize, difficulty: Difficulty) -> f64 {
        let mut score = 40.0;

        score += (self.metric.find_iter(lower).count() as f64 * 10.0).min(25.0);

        let technical = count_present(lower, TECHNICAL_WORDS);
        score += (technical as f64 * 5.0).min(20.0);
        score += (count_present(lower, EXAMPLE_MARKERS) as f64 * 5.0).min(15.0);

        if difficulty == Difficulty::Hard {
            if word_count < 100 {
                score -= 10.0;
            }
            if technical < 2 {
                score -= 5.0;
            }
        }

        score.clamp(0.0, 100.0)
    }

    fn strengths(&self, lower: &str, star: f64, word_count: usize) -> Vec<String> {
        let mut strengths = Vec::new();

        if star >= 75.0 {
            strengths.push("Excellent use of the STAR method to structure your response");
        } else if star >= 50.0 {
            strengths.push("Good structure with clear situation and actions described");
        }
        if (100..=300).contains(&word_count) {
            strengths.push("Well-balanced response length with appropriate detail");
        }
        if self.quantified.is_match(lower) {
            strengths.push("Strong use of quantifiable metrics to demonstrate impact");
        }
        if count_present(lower, ACTION_VERBS) >= 2 {
            strengths.push("Effective use of action verbs to describe your contributions");
        }
        if lower.contains("example") || lower.contains("specifically") {
            strengths.push("Good use of specific examples to illustrate points");
        }

        strengths.into_iter().take(4).map(String::from).collect()
    }

    fn improvements(&self, lower: &str, star: f64, word_count: usize, category: &str) -> Vec<String> {
        let mut improvements = Vec::new();

        if star < 50.0 {
            improvements.push(
                "Structure your response using the STAR method (Situation, Task, Action, Result)"
                    .to_string(),
            );
        }
        if word_count < 75 {
            improvements.push("Provide more detail and context in your response".to_string());
        } else if word_count > 400 {
            improvements.push("Consider being more concise while keeping key points".to_string());
        }
        if !self.team_metric.is_match(lower) {
            improvements.push("Include quantifiable metrics to demonstrate your impact".to_string());
        }

        let missing_star: Vec<String> = STAR_INDICATORS
            .iter()
            .filter(|(_, indicators)| !indicators.iter().any(|i| lower.contains(i)))
            .map(|(component, _)| capitalize(component))
            .collect();
        if !missing_star.is_empty() && missing_star.len() <= 2 {
            improvements.push(format!(
                "Add more detail about the {} in your response",
                missing_star.join(" and ")
            ));
        }

        let expected = expected_topics(category);
        if !expected.is_empty() {
            let missing = expected.iter().filter(|t| !lower.contains(*t)).count();
            if missing > expected.len() / 2 {
                improvements.push(format!(
                    "Address the core aspects of {} more directly",
                    category.replace('_', " ")
                ));
            }
        }

        improvements.truncate(4);
        improvements
    }
}

fn star_score(lower: &str) -> f64 {
    let found = STAR_INDICATORS
        .iter()
        .filter(|(_, indicators)| indicators.iter().any(|i| lower.contains(i)))
        .count();
    (found as f64 * 25.0).min(100.0)
}

fn relevance_score(lower: &str, category: &str) -> f64 {
    let expected = expected_topics(category);
    if expected.is_empty() {
        return 70.0;
    }
    let ratio = count_present(lower, expected) as f64 / expected.len() as f64;
    (ratio * 100.0 + 30.0).min(100.0)
}

fn count_present(lower: &str, words: &[&str]) -> usize {
    words.iter().filter(|w| lower.contains(*w)).count()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn answer_feedback(score: f64, strengths: &[String], improvements: &[String]) -> String {
    let opening = match PerformanceLevel::from_score(score) {
        PerformanceLevel::Excellent => "Excellent response!",
        PerformanceLevel::Good => "Good response with solid content.",
        PerformanceLevel::Average => "Decent response, but there's room for improvement.",
        PerformanceLevel::NeedsImprovement => "This response needs more development.",
    };

    let mut parts = vec![opening.to_string()];
    if let Some(strength) = strengths.first() {
        parts.push(format!("Strengths: {}.", strength.to_lowercase()));
    }
    if let Some(improvement) = improvements.first() {
        parts.push(format!("To improve: {}.", improvement.to_lowercase()));
    }
    parts.join(" ")
}

/// Closing summary used when no generated summary is available
pub fn overall_feedback(score: f64, interview_kind: &str) -> String {
    match PerformanceLevel::from_score(score) {
        PerformanceLevel::Excellent => format!(
            "Outstanding performance on this {interview_kind} interview! You communicated clearly, \
gave detailed examples and structured your answers well."
        ),
        PerformanceLevel::Good => format!(
            "Good performance on this {interview_kind} interview. Your examples were relevant; \
tighter structure and more specifics will make them stronger."
        ),
        PerformanceLevel::Average => format!(
            "Decent performance on this {interview_kind} interview. You covered the basics but \
would benefit from more specific examples and consistent use of STAR."
        ),
        PerformanceLevel::NeedsImprovement => format!(
            "This {interview_kind} interview showed clear room to grow. Prepare concrete stories, \
structure them with STAR and rehearse your delivery."
        ),
    }
}

/// Practice suggestions derived from averaged component scores
pub fn recommendations(score: f64, communication: f64, depth: f64) -> Vec<String> {
    let mut out = Vec::new();

    if score < 70.0 {
        out.push("Practice more mock interviews to build confidence and improve answer quality");
    }
    if communication < 65.0 {
        out.push("Focus on clear, structured communication using the STAR method");
    }
    if depth < 65.0 {
        out.push("Prepare specific examples with quantifiable results for common questions");
    }
    if score >= 80.0 {
        out.push("You're well prepared; focus on refining delivery and confidence");
    }

    out.into_iter().take(4).map(String::from).collect()
}
