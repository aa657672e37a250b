//! Deterministic in-process backend used by tests and offline runs.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::backend::client::{
    AuthApi, AuthUser, BackendError, BackendResult, ChatApi, ChatRequest, ChatRole, ItemPage,
    ItemQuery, SpeechApi, SpeechAudio, TableApi, Transcription, VoiceOptions,
};

/// One-time code accepted for every email.
pub const MEMORY_OTP_CODE: &str = "123456";

#[derive(Debug, Default)]
struct MemoryState {
    pending_otps: BTreeMap<String, String>,
    signed_in: Option<AuthUser>,
    tables: BTreeMap<String, Vec<Value>>,
    transcripts: BTreeMap<String, String>,
    spoken: Vec<String>,
    next_id: u64,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `collection` with `items` (builder style)
    pub fn with_items(self, collection: &str, items: Vec<Value>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state
                .tables
                .entry(collection.to_string())
                .or_default()
                .extend(items);
        }
        self
    }

    /// Make `speech_to_text(audio_ref)` return `text`
    pub fn register_transcript(&self, audio_ref: &str, text: &str) {
        if let Ok(mut state) = self.state.lock() {
            state
                .transcripts
                .insert(audio_ref.to_string(), text.to_string());
        }
    }

    /// Current contents of `collection`
    pub fn items(&self, collection: &str) -> Vec<Value> {
        self.state
            .lock()
            .map(|state| state.tables.get(collection).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Texts sent to text-to-speech, in call order
    pub fn spoken(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.spoken.clone())
            .unwrap_or_default()
    }

    pub fn signed_in(&self) -> Option<AuthUser> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.signed_in.clone())
    }

    fn lock(&self) -> BackendResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| BackendError::Transport("memory backend lock poisoned".to_string()))
    }
}

fn item_id(data: &Value) -> BackendResult<String> {
    data.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| BackendError::Rejected("Item id is required".to_string()))
}

fn as_object(data: Value) -> BackendResult<Map<String, Value>> {
    match data {
        Value::Object(map) => Ok(map),
        _ => Err(BackendError::Rejected(
            "Item must be a JSON object".to_string(),
        )),
    }
}

#[async_trait]
impl AuthApi for MemoryBackend {
    async fn send_otp(&self, email: &str) -> BackendResult<()> {
        if !email.contains('@') {
            return Err(BackendError::Rejected("Invalid email address".to_string()));
        }

        self.lock()?
            .pending_otps
            .insert(email.to_lowercase(), MEMORY_OTP_CODE.to_string());
        Ok(())
    }

    async fn verify_otp(&self, email: &str, code: &str) -> BackendResult<AuthUser> {
        let mut state = self.lock()?;
        let key = email.to_lowercase();

        match state.pending_otps.get(&key) {
            Some(expected) if expected == code => {
                state.pending_otps.remove(&key);
                let user = AuthUser {
                    id: format!("user:{}", key),
                    email: key,
                    name: None,
                };
                state.signed_in = Some(user.clone());
                Ok(user)
            }
            _ => Err(BackendError::Rejected(
                "Invalid or expired code".to_string(),
            )),
        }
    }

    async fn logout(&self) -> BackendResult<()> {
        self.lock()?.signed_in = None;
        Ok(())
    }
}

#[async_trait]
impl TableApi for MemoryBackend {
    async fn get_items(&self, collection: &str, query: &ItemQuery) -> BackendResult<ItemPage> {
        let state = self.lock()?;
        let rows = state.tables.get(collection).map(Vec::as_slice).unwrap_or(&[]);

        let items = rows
            .iter()
            .filter(|item| query.matches(item))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(ItemPage { items })
    }

    async fn add_item(&self, collection: &str, data: Value) -> BackendResult<Value> {
        let mut map = as_object(data)?;
        let mut state = self.lock()?;

        if !map.contains_key("id") {
            state.next_id += 1;
            let id = format!("{}-{}", collection, state.next_id);
            map.insert("id".to_string(), Value::String(id));
        }

        let item = Value::Object(map);
        state
            .tables
            .entry(collection.to_string())
            .or_default()
            .push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, collection: &str, data: Value) -> BackendResult<Value> {
        let id = item_id(&data)?;
        let patch = as_object(data)?;
        let mut state = self.lock()?;

        let existing = state
            .tables
            .get_mut(collection)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get("id").and_then(Value::as_str) == Some(id.as_str()))
            })
            .ok_or_else(|| BackendError::Rejected(format!("Item not found: {}", id)))?;

        if let Value::Object(fields) = &mut *existing {
            for (field, value) in patch {
                fields.insert(field, value);
            }
        }
        Ok(existing.clone())
    }

    async fn delete_item(&self, collection: &str, key: Value) -> BackendResult<()> {
        let id = item_id(&key)?;
        let mut state = self.lock()?;

        let rows = state.tables.entry(collection.to_string()).or_default();
        let before = rows.len();
        rows.retain(|row| row.get("id").and_then(Value::as_str) != Some(id.as_str()));

        if rows.len() == before {
            return Err(BackendError::Rejected(format!("Item not found: {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl SpeechApi for MemoryBackend {
    async fn speech_to_text(&self, audio_ref: &str) -> BackendResult<Transcription> {
        self.lock()?
            .transcripts
            .get(audio_ref)
            .map(|text| Transcription { text: text.clone() })
            .ok_or_else(|| BackendError::Rejected(format!("No transcript for {}", audio_ref)))
    }

    async fn text_to_speech(
        &self,
        text: &str,
        _options: &VoiceOptions,
    ) -> BackendResult<SpeechAudio> {
        let mut state = self.lock()?;
        state.spoken.push(text.to_string());
        Ok(SpeechAudio {
            audio_url: format!("memory://audio/{}", state.spoken.len()),
        })
    }
}

#[async_trait]
impl ChatApi for MemoryBackend {
    async fn complete(&self, request: &ChatRequest) -> BackendResult<String> {
        request
            .messages
            .iter()
            .rev()
            .find(|turn| turn.role == ChatRole::User)
            .map(|turn| format!("Echo: {}", turn.content.trim()))
            .ok_or_else(|| BackendError::Rejected("Empty conversation".to_string()))
    }
}
