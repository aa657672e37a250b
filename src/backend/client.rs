use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::backend::gemini::GeminiBackend;
use crate::backend::memory::MemoryBackend;
use crate::backend::stub::StubBackend;
use crate::config::Settings;

/// Failure reported by any backend capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Backend not implemented")]
    NotImplemented,

    /// The backend answered but refused the request
    #[error("{0}")]
    Rejected(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Signed-in user returned by OTP verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Equality filters plus an optional row limit for `get_items`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    pub filters: Map<String, Value>,
    pub limit: Option<usize>,
}

impl ItemQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::default().filter("id", Value::String(id.to_string())).limit(1)
    }

    pub fn filter(mut self, field: &str, value: Value) -> Self {
        self.filters.insert(field.to_string(), value);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `item` has every filtered field with an equal value
    pub fn matches(&self, item: &Value) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| item.get(field) == Some(expected))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPage {
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceOptions {
    pub voice: String,
    pub speed: f32,
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self {
            voice: "alloy".to_string(),
            speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub audio_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Chat completion request payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Single user prompt
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatTurn::new(ChatRole::User, text)],
            temperature: None,
        }
    }
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn send_otp(&self, email: &str) -> BackendResult<()>;
    async fn verify_otp(&self, email: &str, code: &str) -> BackendResult<AuthUser>;
    async fn logout(&self) -> BackendResult<()>;
}

#[async_trait]
pub trait TableApi: Send + Sync {
    async fn get_items(&self, collection: &str, query: &ItemQuery) -> BackendResult<ItemPage>;
    async fn add_item(&self, collection: &str, data: Value) -> BackendResult<Value>;
    /// `data` must carry the item's `id`; other fields are merged into it.
    async fn update_item(&self, collection: &str, data: Value) -> BackendResult<Value>;
    async fn delete_item(&self, collection: &str, key: Value) -> BackendResult<()>;
}

#[async_trait]
pub trait SpeechApi: Send + Sync {
    async fn speech_to_text(&self, audio_ref: &str) -> BackendResult<Transcription>;
    async fn text_to_speech(&self, text: &str, options: &VoiceOptions) -> BackendResult<SpeechAudio>;
}

#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> BackendResult<String>;
}

/// Every capability the containers consume.
pub trait Backend: AuthApi + TableApi + SpeechApi + ChatApi {}

impl<T: AuthApi + TableApi + SpeechApi + ChatApi> Backend for T {}

/// Build a backend adapter from runtime settings.
pub fn build_backend(settings: &Settings) -> Result<Arc<dyn Backend>> {
    match settings.backend.provider.to_lowercase().as_str() {
        "stub" => Ok(Arc::new(StubBackend)),
        "memory" => Ok(Arc::new(MemoryBackend::new())),
        "gemini" => Ok(Arc::new(GeminiBackend::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported backend.provider '{}'. Supported providers: stub, memory, gemini",
            other
        ),
    }
}
