//! Mock interview sessions: state store, scoring and progress

mod coach;
mod command;
mod evaluator;
mod models;
mod progress;
pub mod questions;
mod store;

pub use coach::{render_transcript, InterviewCoach, SessionSummary};
pub use command::{
    FeedbackPatch, Ignored, MessagePatch, MetricsPatch, NewMessage, NewSession, Outcome,
    ScoresPatch, SessionCommand,
};
pub use evaluator::{
    overall_feedback, recommendations, PerformanceLevel, ResponseEvaluation, ResponseEvaluator,
};
pub use models::{
    Difficulty, Feedback, InterviewHistory, InterviewMessage, InterviewQuestion, InterviewSession,
    MessageRole, Metrics, Scores, SessionSettings, SessionStatus,
};
pub use progress::{
    calculate_progress, DifficultyStats, InterviewStats, Progress, ProgressTrend, ScorePoint,
};
pub use store::{InterviewState, InterviewStore, StoreOptions, INTERVIEW_STORAGE_KEY};

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
