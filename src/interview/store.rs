//! Interview session store
//!
//! Holds at most one current session plus the bounded history of completed
//! sessions. All changes go through [`InterviewStore::dispatch`]; only the
//! history is persisted.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::InterviewSettings;
use crate::interview::command::{Ignored, NewMessage, NewSession, Outcome, SessionCommand};
use crate::interview::command::{FeedbackPatch, MessagePatch, MetricsPatch, ScoresPatch};
use crate::interview::command::{score_value, seconds_value};
use crate::interview::models::{
    Difficulty, InterviewHistory, InterviewMessage, InterviewQuestion, InterviewSession,
    SessionSettings, SessionStatus,
};
use crate::interview::progress::{calculate_progress, InterviewStats, Progress};
use crate::storage::{load_snapshot, save_snapshot, KeyValueStore};

/// Storage key for the persisted interview history
pub const INTERVIEW_STORAGE_KEY: &str = "interview-storage";

/// Everything the store holds in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewState {
    pub current_session: Option<InterviewSession>,
    pub current_question: Option<InterviewQuestion>,
    pub history: InterviewHistory,
    pub is_recording: bool,
    pub is_playing: bool,
    pub is_loading: bool,
    pub transcription: String,
}

/// Defaults applied to new sessions and the history bound
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    pub auto_play: bool,
    pub duration_minutes: u32,
    pub max_history: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            auto_play: true,
            duration_minutes: 30,
            max_history: 50,
        }
    }
}

impl From<&InterviewSettings> for StoreOptions {
    fn from(settings: &InterviewSettings) -> Self {
        Self {
            auto_play: settings.auto_play,
            duration_minutes: settings.duration_minutes,
            max_history: settings.max_history,
        }
    }
}

#[derive(Serialize)]
struct PersistedInterviewRef<'a> {
    history: &'a InterviewHistory,
}

#[derive(Deserialize)]
struct PersistedInterview {
    #[serde(default)]
    history: InterviewHistory,
}

pub struct InterviewStore {
    state: InterviewState,
    storage: Box<dyn KeyValueStore>,
    options: StoreOptions,
}

impl InterviewStore {
    /// Build a store and rehydrate its history from `storage`
    pub fn open(storage: Box<dyn KeyValueStore>, options: StoreOptions) -> Self {
        let history = match load_snapshot::<PersistedInterview>(
            storage.as_ref(),
            INTERVIEW_STORAGE_KEY,
        ) {
            Ok(Some(persisted)) => {
                info!(
                    "Restored interview history ({} sessions)",
                    persisted.history.sessions.len()
                );
                persisted.history
            }
            Ok(None) => InterviewHistory::default(),
            Err(e) => {
                warn!("Discarding unreadable interview history: {:#}", e);
                InterviewHistory::default()
            }
        };

        Self {
            state: InterviewState {
                history,
                ..InterviewState::default()
            },
            storage,
            options,
        }
    }

    pub fn state(&self) -> &InterviewState {
        &self.state
    }

    pub fn current_session(&self) -> Option<&InterviewSession> {
        self.state.current_session.as_ref()
    }

    pub fn history(&self) -> &InterviewHistory {
        &self.state.history
    }

    /// Apply a command. Ignored commands leave the state untouched.
    pub fn dispatch(&mut self, command: SessionCommand) -> Outcome {
        let touches_history = matches!(
            command,
            SessionCommand::End | SessionCommand::SaveSession(_)
        );
        let label = command_label(&command);

        match self.apply(command) {
            Ok(()) => {
                if touches_history {
                    self.persist();
                }
                Outcome::Applied
            }
            Err(reason) => {
                debug!("Ignored {}: {}", label, reason);
                Outcome::Ignored(reason)
            }
        }
    }

    fn apply(&mut self, command: SessionCommand) -> Result<(), Ignored> {
        match command {
            SessionCommand::Create(new) => {
                self.begin_session(new);
            }
            SessionCommand::Start { id } => {
                let session = self.session_mut()?;
                if session.id != id {
                    return Err(Ignored::SessionMismatch);
                }
                transition(session, SessionStatus::Active)?;
                session.start_time = Utc::now();
            }
            SessionCommand::Pause => {
                transition(self.session_mut()?, SessionStatus::Paused)?;
            }
            SessionCommand::Resume => {
                transition(self.session_mut()?, SessionStatus::Active)?;
            }
            SessionCommand::End => {
                let session = self.session_mut()?;
                transition(session, SessionStatus::Completed)?;
                session.end_time = Some(Utc::now());

                let (answered, total_time) = session
                    .candidate_messages()
                    .fold((0u32, 0.0f64), |(count, total), message| {
                        (count + 1, total + message.response_time.unwrap_or(0.0))
                    });
                session.metrics.questions_answered = answered;
                session.metrics.average_response_time = if answered == 0 {
                    0.0
                } else {
                    total_time / answered as f64
                };

                let snapshot = session.clone();
                self.record_completed(snapshot);
            }
            SessionCommand::AddMessage(new) => {
                let session = self.session_mut()?;
                session.messages.push(InterviewMessage {
                    id: uuid::Uuid::new_v4().to_string(),
                    role: new.role,
                    content: new.content,
                    timestamp: Utc::now(),
                    audio_url: new.audio_url,
                    is_typing: new.is_typing,
                    question_id: new.question_id,
                    response_time: new.response_time.and_then(seconds_value),
                });
            }
            SessionCommand::UpdateMessage { id, patch } => {
                let message = self
                    .session_mut()?
                    .messages
                    .iter_mut()
                    .find(|m| m.id == id)
                    .ok_or(Ignored::MessageNotFound)?;
                apply_message_patch(message, patch);
            }
            SessionCommand::SetCurrentQuestion(question) => {
                self.state.current_question = question;
            }
            SessionCommand::MarkQuestionAsked(question_id) => {
                self.session_mut()?.questions_asked.push(question_id);
            }
            SessionCommand::UpdateScores(patch) => {
                patch.apply(&mut self.session_mut()?.scores);
            }
            SessionCommand::UpdateFeedback(patch) => {
                patch.apply(&mut self.session_mut()?.feedback);
            }
            SessionCommand::UpdateMetrics(patch) => {
                patch.apply(&mut self.session_mut()?.metrics);
            }
            SessionCommand::SaveSession(mut session) => {
                sanitize_numbers(&mut session);
                let history = &mut self.state.history;
                history.sessions.retain(|s| s.id != session.id);
                history.sessions.insert(0, *session);
                history.sessions.truncate(self.options.max_history.max(1));
                history.recompute_average();
            }
            SessionCommand::SetRecording(on) => self.state.is_recording = on,
            SessionCommand::SetPlaying(on) => self.state.is_playing = on,
            SessionCommand::SetLoading(on) => self.state.is_loading = on,
            SessionCommand::SetTranscription(text) => self.state.transcription = text,
            SessionCommand::Reset => {
                self.state.current_session = None;
                self.state.current_question = None;
                self.state.is_recording = false;
                self.state.is_playing = false;
                self.state.is_loading = false;
                self.state.transcription.clear();
            }
        }

        Ok(())
    }

    fn session_mut(&mut self) -> Result<&mut InterviewSession, Ignored> {
        self.state
            .current_session
            .as_mut()
            .ok_or(Ignored::NoActiveSession)
    }

    fn begin_session(&mut self, new: NewSession) -> &InterviewSession {
        let session = InterviewSession {
            id: uuid::Uuid::new_v4().to_string(),
            role: new.role,
            company: new.company,
            difficulty: new.difficulty,
            start_time: Utc::now(),
            end_time: None,
            status: SessionStatus::Setup,
            messages: Vec::new(),
            questions_asked: Vec::new(),
            scores: Default::default(),
            feedback: Default::default(),
            metrics: Default::default(),
            settings: SessionSettings {
                voice_enabled: new.voice_enabled,
                auto_play: self.options.auto_play,
                difficulty: new.difficulty,
                duration_minutes: self.options.duration_minutes,
            },
        };

        debug!("Created interview session {}", session.id);
        self.state.current_session.insert(session)
    }

    fn record_completed(&mut self, snapshot: InterviewSession) {
        let history = &mut self.state.history;

        info!(
            "Interview session {} completed (overall {:.1})",
            snapshot.id, snapshot.scores.overall
        );

        history.sessions.insert(0, snapshot);
        history.sessions.truncate(self.options.max_history.max(1));
        history.total_interviews += 1;
        history.recompute_average();

        if let [latest, previous, ..] = history.sessions.as_slice() {
            // A zero baseline has no meaningful percentage change.
            history.improvement_trend = if previous.scores.overall == 0.0 {
                0.0
            } else {
                (latest.scores.overall - previous.scores.overall) / previous.scores.overall * 100.0
            };
        } else {
            history.improvement_trend = 0.0;
        }
    }

    fn persist(&self) {
        let persisted = PersistedInterviewRef {
            history: &self.state.history,
        };

        if let Err(e) = save_snapshot(self.storage.as_ref(), INTERVIEW_STORAGE_KEY, &persisted) {
            warn!("Failed to persist interview history: {:#}", e);
        }
    }

    // Named operations, each a thin wrapper over `dispatch`.

    /// Replace any current session with a fresh one in `setup`
    pub fn create_session(
        &mut self,
        role: impl Into<String>,
        company: impl Into<String>,
        difficulty: Difficulty,
        voice_enabled: bool,
    ) -> &InterviewSession {
        self.begin_session(NewSession {
            role: role.into(),
            company: company.into(),
            difficulty,
            voice_enabled,
        })
    }

    pub fn start_session(&mut self, id: &str) -> Outcome {
        self.dispatch(SessionCommand::Start { id: id.to_string() })
    }

    pub fn pause_session(&mut self) -> Outcome {
        self.dispatch(SessionCommand::Pause)
    }

    pub fn resume_session(&mut self) -> Outcome {
        self.dispatch(SessionCommand::Resume)
    }

    pub fn end_session(&mut self) -> Outcome {
        self.dispatch(SessionCommand::End)
    }

    /// Append a message; returns its generated id when applied
    pub fn add_message(&mut self, message: NewMessage) -> Option<String> {
        match self.dispatch(SessionCommand::AddMessage(message)) {
            Outcome::Applied => self
                .current_session()
                .and_then(|s| s.messages.last())
                .map(|m| m.id.clone()),
            Outcome::Ignored(_) => None,
        }
    }

    pub fn update_message(&mut self, id: &str, patch: MessagePatch) -> Outcome {
        self.dispatch(SessionCommand::UpdateMessage {
            id: id.to_string(),
            patch,
        })
    }

    pub fn set_current_question(&mut self, question: Option<InterviewQuestion>) -> Outcome {
        self.dispatch(SessionCommand::SetCurrentQuestion(question))
    }

    pub fn mark_question_asked(&mut self, question_id: &str) -> Outcome {
        self.dispatch(SessionCommand::MarkQuestionAsked(question_id.to_string()))
    }

    pub fn update_scores(&mut self, patch: ScoresPatch) -> Outcome {
        self.dispatch(SessionCommand::UpdateScores(patch))
    }

    pub fn update_feedback(&mut self, patch: FeedbackPatch) -> Outcome {
        self.dispatch(SessionCommand::UpdateFeedback(patch))
    }

    pub fn update_metrics(&mut self, patch: MetricsPatch) -> Outcome {
        self.dispatch(SessionCommand::UpdateMetrics(patch))
    }

    pub fn save_session(&mut self, session: InterviewSession) -> Outcome {
        self.dispatch(SessionCommand::SaveSession(Box::new(session)))
    }

    pub fn reset(&mut self) -> Outcome {
        self.dispatch(SessionCommand::Reset)
    }

    pub fn get_session_by_id(&self, id: &str) -> Option<&InterviewSession> {
        self.state.history.sessions.iter().find(|s| s.id == id)
    }

    /// Find a history entry by id prefix, newest first
    pub fn find_session_by_prefix(&self, prefix: &str) -> Option<&InterviewSession> {
        if prefix.is_empty() {
            return None;
        }
        self.state
            .history
            .sessions
            .iter()
            .find(|s| s.id.starts_with(prefix))
    }

    pub fn calculate_progress(&self) -> Progress {
        calculate_progress(&self.state.history)
    }

    pub fn stats(&self) -> InterviewStats {
        InterviewStats::from_history(&self.state.history)
    }
}

fn transition(session: &mut InterviewSession, to: SessionStatus) -> Result<(), Ignored> {
    if !session.status.can_transition_to(to) {
        return Err(Ignored::InvalidTransition {
            from: session.status,
            to,
        });
    }
    session.status = to;
    Ok(())
}

/// Replace non-finite values in a caller-built session so the history stays
/// serializable and the average stays a number
fn sanitize_numbers(session: &mut InterviewSession) {
    let scores = &mut session.scores;
    for value in [
        &mut scores.technical,
        &mut scores.communication,
        &mut scores.problem_solving,
        &mut scores.behavioral,
        &mut scores.overall,
    ] {
        *value = score_value(*value).unwrap_or(0.0);
    }

    let metrics = &mut session.metrics;
    for value in [
        &mut metrics.confidence_score,
        &mut metrics.clarity_score,
        &mut metrics.relevance_score,
    ] {
        *value = score_value(*value).unwrap_or(0.0);
    }
    metrics.average_response_time = seconds_value(metrics.average_response_time).unwrap_or(0.0);

    for message in &mut session.messages {
        message.response_time = message.response_time.and_then(seconds_value);
    }
}

fn apply_message_patch(message: &mut InterviewMessage, patch: MessagePatch) {
    if let Some(content) = patch.content {
        message.content = content;
    }
    if let Some(audio_url) = patch.audio_url {
        message.audio_url = Some(audio_url);
    }
    if let Some(is_typing) = patch.is_typing {
        message.is_typing = is_typing;
    }
    if let Some(question_id) = patch.question_id {
        message.question_id = Some(question_id);
    }
    if let Some(response_time) = patch.response_time.and_then(seconds_value) {
        message.response_time = Some(response_time);
    }
}

fn command_label(command: &SessionCommand) -> &'static str {
    match command {
        SessionCommand::Create(_) => "create",
        SessionCommand::Start { .. } => "start",
        SessionCommand::Pause => "pause",
        SessionCommand::Resume => "resume",
        SessionCommand::End => "end",
        SessionCommand::AddMessage(_) => "add_message",
        SessionCommand::UpdateMessage { .. } => "update_message",
        SessionCommand::SetCurrentQuestion(_) => "set_current_question",
        SessionCommand::MarkQuestionAsked(_) => "mark_question_asked",
        SessionCommand::UpdateScores(_) => "update_scores",
        SessionCommand::UpdateFeedback(_) => "update_feedback",
        SessionCommand::UpdateMetrics(_) => "update_metrics",
        SessionCommand::SaveSession(_) => "save_session",
        SessionCommand::SetRecording(_) => "set_recording",
        SessionCommand::SetPlaying(_) => "set_playing",
        SessionCommand::SetLoading(_) => "set_loading",
        SessionCommand::SetTranscription(_) => "set_transcription",
        SessionCommand::Reset => "reset",
    }
}
