//! Interview session data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Question difficulty, also used as the session-level difficulty
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!(
                "unknown difficulty '{}' (expected easy, medium or hard)",
                other
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a session: setup -> active <-> paused -> completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Setup,
    Active,
    Paused,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Setup, Self::Active)
                | (Self::Active, Self::Paused)
                | (Self::Paused, Self::Active)
                | (Self::Active, Self::Completed)
                | (Self::Paused, Self::Completed)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Interviewer,
    Candidate,
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,

    /// Synthesized or recorded audio for this message
    #[serde(default)]
    pub audio_url: Option<String>,

    /// Interviewer is still "typing" this message
    #[serde(default)]
    pub is_typing: bool,

    /// Question this message asks or answers
    #[serde(default)]
    pub question_id: Option<String>,

    /// Seconds the candidate took to answer
    #[serde(default)]
    pub response_time: Option<f64>,
}

/// Per-dimension scores, each 0-100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub technical: f64,
    pub communication: f64,
    pub problem_solving: f64,
    pub behavioral: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean candidate response time in seconds
    pub average_response_time: f64,
    pub total_questions: u32,
    pub questions_answered: u32,
    pub confidence_score: f64,
    pub clarity_score: f64,
    pub relevance_score: f64,
}

/// Settings captured when the session was created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub voice_enabled: bool,
    pub auto_play: bool,
    pub difficulty: Difficulty,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: String,
    pub role: String,
    pub company: String,
    pub difficulty: Difficulty,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    #[serde(default)]
    pub messages: Vec<InterviewMessage>,
    /// Identifiers of questions asked so far; may contain repeats
    #[serde(default)]
    pub questions_asked: Vec<String>,
    #[serde(default)]
    pub scores: Scores,
    #[serde(default)]
    pub feedback: Feedback,
    #[serde(default)]
    pub metrics: Metrics,
    pub settings: SessionSettings,
}

impl InterviewSession {
    /// Messages written by the candidate, in transcript order
    pub fn candidate_messages(&self) -> impl Iterator<Item = &InterviewMessage> {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::Candidate)
    }

    /// Wall-clock length of a finished session in whole minutes
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end - self.start_time).num_minutes().max(0))
    }

    /// Short identifier for listings
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// Completed sessions, newest first, plus running aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewHistory {
    pub sessions: Vec<InterviewSession>,
    pub total_interviews: u32,
    pub average_score: f64,
    /// Percent change of the newest overall score against the previous one
    pub improvement_trend: f64,
}

impl InterviewHistory {
    /// Recompute `average_score` as the mean overall score of stored sessions
    pub fn recompute_average(&mut self) {
        self.average_score = if self.sessions.is_empty() {
            0.0
        } else {
            self.sessions.iter().map(|s| s.scores.overall).sum::<f64>()
                / self.sessions.len() as f64
        };
    }
}

/// A question the interviewer can ask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub id: String,
    pub text: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_lifecycle_transitions_are_legal() {
        use SessionStatus::*;

        assert!(Setup.can_transition_to(Active));
        assert!(Active.can_transition_to(Paused));
        assert!(Paused.can_transition_to(Active));
        assert!(Active.can_transition_to(Completed));
        assert!(Paused.can_transition_to(Completed));

        assert!(!Setup.can_transition_to(Paused));
        assert!(!Setup.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn empty_history_average_is_zero() {
        let mut history = InterviewHistory::default();
        history.recompute_average();
        assert_eq!(history.average_score, 0.0);
    }
}
