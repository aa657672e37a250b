//! Runs a practice interview over the session store and the backend port

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::{prompts, Backend, ChatRequest, ChatRole, ChatTurn, VoiceOptions};
use crate::interview::command::{
    FeedbackPatch, MessagePatch, MetricsPatch, NewMessage, Outcome, ScoresPatch, SessionCommand,
};
use crate::interview::evaluator::{
    overall_feedback, recommendations, PerformanceLevel, ResponseEvaluation, ResponseEvaluator,
};
use crate::interview::models::{
    Difficulty, InterviewQuestion, InterviewSession, MessageRole, SessionStatus,
};
use crate::interview::questions::next_question;
use crate::interview::round1;
use crate::interview::store::InterviewStore;
use crate::{AlchemistError, Result};

const MAX_FEEDBACK_ITEMS: usize = 5;

/// What `finish` hands back to the caller
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub session: InterviewSession,
    pub level: PerformanceLevel,
    pub summary: String,
}

pub struct InterviewCoach {
    store: InterviewStore,
    backend: Arc<dyn Backend>,
    evaluator: ResponseEvaluator,
    voice: VoiceOptions,
}

impl InterviewCoach {
    pub fn new(store: InterviewStore, backend: Arc<dyn Backend>, voice: VoiceOptions) -> Result<Self> {
        Ok(Self {
            store,
            backend,
            evaluator: ResponseEvaluator::new()?,
            voice,
        })
    }

    pub fn store(&self) -> &InterviewStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut InterviewStore {
        &mut self.store
    }

    pub fn into_store(self) -> InterviewStore {
        self.store
    }

    /// Create a session and move it straight to `active`; returns its id
    pub fn begin(
        &mut self,
        role: &str,
        company: &str,
        difficulty: Difficulty,
        voice_enabled: bool,
    ) -> String {
        let id = self
            .store
            .create_session(role, company, difficulty, voice_enabled)
            .id
            .clone();
        self.store.start_session(&id);
        info!("Started practice interview {} for {} at {}", id, role, company);
        id
    }

    /// Ask the next unasked question, or `None` when the bank is exhausted
    pub async fn ask_next_question(&mut self) -> Result<Option<InterviewQuestion>> {
        let session = self
            .store
            .current_session()
            .ok_or(AlchemistError::NoActiveSession)?;

        let Some(question) = next_question(session.difficulty, &session.questions_asked) else {
            debug!("Question bank exhausted for session {}", session.id);
            return Ok(None);
        };
        let speak = session.settings.voice_enabled && session.settings.auto_play;

        self.store.set_current_question(Some(question.clone()));
        self.store.mark_question_asked(&question.id);
        let message_id = self
            .store
            .add_message(NewMessage::interviewer(question.text.clone()).for_question(question.id.clone()));

        let asked = self
            .store
            .current_session()
            .map(|s| s.questions_asked.len() as u32)
            .unwrap_or_default();
        self.store.update_metrics(MetricsPatch {
            total_questions: Some(asked),
            ..MetricsPatch::default()
        });

        if let (true, Some(message_id)) = (speak, message_id) {
            self.store.dispatch(SessionCommand::SetPlaying(true));
            match self.backend.text_to_speech(&question.text, &self.voice).await {
                Ok(audio) => {
                    self.store.update_message(
                        &message_id,
                        MessagePatch {
                            audio_url: Some(audio.audio_url),
                            ..MessagePatch::default()
                        },
                    );
                }
                Err(e) => warn!("Text-to-speech failed, continuing without audio: {}", e),
            }
            self.store.dispatch(SessionCommand::SetPlaying(false));
        }

        Ok(Some(question))
    }

    /// Record the candidate's answer to the current question and score it
    pub async fn submit_answer(
        &mut self,
        text: &str,
        response_time: Option<f64>,
    ) -> Result<ResponseEvaluation> {
        if self.store.current_session().is_none() {
            return Err(AlchemistError::NoActiveSession);
        }
        let question = self
            .store
            .state()
            .current_question
            .clone()
            .ok_or_else(|| AlchemistError::Other("No question has been asked yet".to_string()))?;

        let mut message = NewMessage::candidate(text.trim()).for_question(question.id.clone());
        if let Some(seconds) = response_time {
            message = message.with_response_time(seconds);
        }
        self.store.add_message(message);

        let evaluation = self.evaluator.evaluate(&question, text);
        self.fold_evaluation(&evaluation);

        debug!(
            "Answer to {} scored {:.1} ({})",
            question.id,
            evaluation.score,
            PerformanceLevel::from_score(evaluation.score)
        );
        Ok(evaluation)
    }

    fn fold_evaluation(&mut self, evaluation: &ResponseEvaluation) {
        let Some(session) = self.store.current_session() else {
            return;
        };

        let answered = session
            .candidate_messages()
            .count()
            .max(1) as f64;
        let running = |previous: f64, latest: f64| round1(previous + (latest - previous) / answered);

        let scores = ScoresPatch {
            technical: Some(running(session.scores.technical, evaluation.depth_score)),
            communication: Some(running(
                session.scores.communication,
                evaluation.communication_score,
            )),
            problem_solving: Some(running(
                session.scores.problem_solving,
                evaluation.relevance_score,
            )),
            behavioral: Some(running(session.scores.behavioral, evaluation.star_score)),
            overall: Some(running(session.scores.overall, evaluation.score)),
        };
        let metrics = MetricsPatch {
            clarity_score: Some(running(
                session.metrics.clarity_score,
                evaluation.communication_score,
            )),
            relevance_score: Some(running(
                session.metrics.relevance_score,
                evaluation.relevance_score,
            )),
            confidence_score: Some(running(
                session.metrics.confidence_score,
                evaluation.star_score,
            )),
            ..MetricsPatch::default()
        };
        let feedback = FeedbackPatch {
            strengths: Some(merge_unique(
                &session.feedback.strengths,
                &evaluation.strengths,
            )),
            improvements: Some(merge_unique(
                &session.feedback.improvements,
                &evaluation.improvements,
            )),
            suggestions: None,
        };

        self.store.update_scores(scores);
        self.store.update_metrics(metrics);
        self.store.update_feedback(feedback);
    }

    /// Turn recorded audio into text via the backend
    pub async fn transcribe(&mut self, audio_ref: &str) -> Result<String> {
        self.store.dispatch(SessionCommand::SetLoading(true));
        let result = self.backend.speech_to_text(audio_ref).await;
        self.store.dispatch(SessionCommand::SetLoading(false));

        let transcription = result?;
        self.store
            .dispatch(SessionCommand::SetTranscription(transcription.text.clone()));
        Ok(transcription.text)
    }

    /// End the session, record it in history and produce a closing summary
    pub async fn finish(&mut self) -> Result<SessionSummary> {
        let session = self
            .store
            .current_session()
            .ok_or(AlchemistError::NoActiveSession)?;
        if !session.status.can_transition_to(SessionStatus::Completed) {
            return Err(AlchemistError::Other(format!(
                "Interview cannot be finished while {}",
                session.status
            )));
        }

        let suggestions = recommendations(
            session.scores.overall,
            session.scores.communication,
            session.scores.technical,
        );
        self.store.update_feedback(FeedbackPatch {
            suggestions: Some(suggestions),
            ..FeedbackPatch::default()
        });

        if let Outcome::Ignored(reason) = self.store.end_session() {
            return Err(AlchemistError::Other(format!(
                "Interview cannot be finished: {}",
                reason
            )));
        }

        let session = self
            .store
            .current_session()
            .cloned()
            .ok_or(AlchemistError::NoActiveSession)?;
        let score = session.scores.overall;

        let prompt = prompts::build_session_summary_prompt(
            &session.role,
            &session.company,
            score,
            &render_transcript(&session),
        );
        let request = ChatRequest {
            messages: vec![
                ChatTurn::new(ChatRole::System, prompts::CAREER_ASSISTANT_PROMPT),
                ChatTurn::new(ChatRole::User, prompt),
            ],
            temperature: Some(0.4),
        };

        let summary = match self.backend.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => overall_feedback(score, "mock"),
            Err(e) => {
                debug!("Falling back to templated summary: {}", e);
                overall_feedback(score, "mock")
            }
        };

        Ok(SessionSummary {
            level: PerformanceLevel::from_score(score),
            session,
            summary,
        })
    }
}

fn merge_unique(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for item in existing.iter().chain(incoming) {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged.truncate(MAX_FEEDBACK_ITEMS);
    merged
}

/// Plain-text transcript, one line per message
pub fn render_transcript(session: &InterviewSession) -> String {
    session
        .messages
        .iter()
        .map(|m| {
            let speaker = match m.role {
                MessageRole::Interviewer => "Interviewer",
                MessageRole::Candidate => "Candidate",
            };
            format!("{}: {}", speaker, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
