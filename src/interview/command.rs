//! Typed commands accepted by the interview store

use crate::interview::models::{
    Difficulty, Feedback, InterviewQuestion, InterviewSession, MessageRole, Metrics, Scores,
    SessionStatus,
};

/// Every state change the interview store knows how to apply
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Create(NewSession),
    Start { id: String },
    Pause,
    Resume,
    End,
    AddMessage(NewMessage),
    UpdateMessage { id: String, patch: MessagePatch },
    SetCurrentQuestion(Option<InterviewQuestion>),
    MarkQuestionAsked(String),
    UpdateScores(ScoresPatch),
    UpdateFeedback(FeedbackPatch),
    UpdateMetrics(MetricsPatch),
    SaveSession(Box<InterviewSession>),
    SetRecording(bool),
    SetPlaying(bool),
    SetLoading(bool),
    SetTranscription(String),
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub role: String,
    pub company: String,
    pub difficulty: Difficulty,
    pub voice_enabled: bool,
}

/// Message fields supplied by the caller; id and timestamp are generated
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub role: MessageRole,
    pub content: String,
    pub audio_url: Option<String>,
    pub is_typing: bool,
    pub question_id: Option<String>,
    pub response_time: Option<f64>,
}

impl NewMessage {
    pub fn interviewer(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Interviewer, content)
    }

    pub fn candidate(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Candidate, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            audio_url: None,
            is_typing: false,
            question_id: None,
            response_time: None,
        }
    }

    pub fn for_question(mut self, question_id: impl Into<String>) -> Self {
        self.question_id = Some(question_id.into());
        self
    }

    pub fn with_response_time(mut self, seconds: f64) -> Self {
        self.response_time = Some(seconds);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePatch {
    pub content: Option<String>,
    pub audio_url: Option<String>,
    pub is_typing: Option<bool>,
    pub question_id: Option<String>,
    pub response_time: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoresPatch {
    pub technical: Option<f64>,
    pub communication: Option<f64>,
    pub problem_solving: Option<f64>,
    pub behavioral: Option<f64>,
    pub overall: Option<f64>,
}

impl ScoresPatch {
    pub fn apply(&self, scores: &mut Scores) {
        merge_score(&mut scores.technical, self.technical);
        merge_score(&mut scores.communication, self.communication);
        merge_score(&mut scores.problem_solving, self.problem_solving);
        merge_score(&mut scores.behavioral, self.behavioral);
        merge_score(&mut scores.overall, self.overall);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackPatch {
    pub strengths: Option<Vec<String>>,
    pub improvements: Option<Vec<String>>,
    pub suggestions: Option<Vec<String>>,
}

impl FeedbackPatch {
    pub fn apply(&self, feedback: &mut Feedback) {
        if let Some(strengths) = &self.strengths {
            feedback.strengths = strengths.clone();
        }
        if let Some(improvements) = &self.improvements {
            feedback.improvements = improvements.clone();
        }
        if let Some(suggestions) = &self.suggestions {
            feedback.suggestions = suggestions.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsPatch {
    pub average_response_time: Option<f64>,
    pub total_questions: Option<u32>,
    pub questions_answered: Option<u32>,
    pub confidence_score: Option<f64>,
    pub clarity_score: Option<f64>,
    pub relevance_score: Option<f64>,
}

impl MetricsPatch {
    pub fn apply(&self, metrics: &mut Metrics) {
        if let Some(seconds) = self.average_response_time.and_then(seconds_value) {
            metrics.average_response_time = seconds;
        }
        if let Some(total) = self.total_questions {
            metrics.total_questions = total;
        }
        if let Some(answered) = self.questions_answered {
            metrics.questions_answered = answered;
        }
        merge_score(&mut metrics.confidence_score, self.confidence_score);
        merge_score(&mut metrics.clarity_score, self.clarity_score);
        merge_score(&mut metrics.relevance_score, self.relevance_score);
    }
}

fn merge_score(target: &mut f64, value: Option<f64>) {
    if let Some(value) = value.and_then(score_value) {
        *target = value;
    }
}

/// A finite score clamped to 0-100. NaN and infinities count as absent.
pub(crate) fn score_value(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

/// A finite, non-negative duration in seconds
pub(crate) fn seconds_value(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.max(0.0))
}

/// Result of dispatching a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(Ignored),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Why a command left the state untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Ignored {
    #[error("no active session")]
    NoActiveSession,
    #[error("session id does not match the current session")]
    SessionMismatch,
    #[error("cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
    #[error("message not found")]
    MessageNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_patch_values_are_ignored() {
        let mut scores = Scores {
            overall: 72.0,
            technical: 50.0,
            ..Scores::default()
        };
        ScoresPatch {
            overall: Some(f64::NAN),
            technical: Some(f64::INFINITY),
            behavioral: Some(f64::NEG_INFINITY),
            ..ScoresPatch::default()
        }
        .apply(&mut scores);
        assert_eq!(scores.overall, 72.0);
        assert_eq!(scores.technical, 50.0);
        assert_eq!(scores.behavioral, 0.0);

        let mut metrics = Metrics {
            average_response_time: 12.0,
            clarity_score: 40.0,
            ..Metrics::default()
        };
        MetricsPatch {
            average_response_time: Some(f64::NAN),
            clarity_score: Some(f64::NAN),
            ..MetricsPatch::default()
        }
        .apply(&mut metrics);
        assert_eq!(metrics.average_response_time, 12.0);
        assert_eq!(metrics.clarity_score, 40.0);
    }

    #[test]
    fn ignored_reasons_read_as_sentences() {
        let reason = Ignored::InvalidTransition {
            from: SessionStatus::Completed,
            to: SessionStatus::Active,
        };
        assert_eq!(reason.to_string(), "cannot move from Completed to Active");
        assert_eq!(Ignored::NoActiveSession.to_string(), "no active session");
    }

    #[test]
    fn score_patch_only_touches_given_fields_and_clamps() {
        let mut scores = Scores {
            technical: 40.0,
            ..Scores::default()
        };

        ScoresPatch {
            communication: Some(130.0),
            overall: Some(-4.0),
            ..ScoresPatch::default()
        }
        .apply(&mut scores);

        assert_eq!(scores.technical, 40.0);
        assert_eq!(scores.communication, 100.0);
        assert_eq!(scores.overall, 0.0);
    }

    #[test]
    fn feedback_patch_replaces_whole_lists() {
        let mut feedback = Feedback {
            strengths: vec!["clear".to_string()],
            improvements: vec!["metrics".to_string()],
            suggestions: Vec::new(),
        };

        FeedbackPatch {
            strengths: Some(vec!["structured".to_string()]),
            ..FeedbackPatch::default()
        }
        .apply(&mut feedback);

        assert_eq!(feedback.strengths, vec!["structured".to_string()]);
        assert_eq!(feedback.improvements, vec!["metrics".to_string()]);
    }
}
