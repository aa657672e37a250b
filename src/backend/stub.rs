//! Reference adapter: every capability reports `NotImplemented`.

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::client::{
    AuthApi, AuthUser, BackendError, BackendResult, ChatApi, ChatRequest, ItemPage, ItemQuery,
    SpeechApi, SpeechAudio, TableApi, Transcription, VoiceOptions,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct StubBackend;

#[async_trait]
impl AuthApi for StubBackend {
    async fn send_otp(&self, _email: &str) -> BackendResult<()> {
        Err(BackendError::NotImplemented)
    }

    async fn verify_otp(&self, _email: &str, _code: &str) -> BackendResult<AuthUser> {
        Err(BackendError::NotImplemented)
    }

    async fn logout(&self) -> BackendResult<()> {
        Err(BackendError::NotImplemented)
    }
}

#[async_trait]
impl TableApi for StubBackend {
    async fn get_items(&self, _collection: &str, _query: &ItemQuery) -> BackendResult<ItemPage> {
        Err(BackendError::NotImplemented)
    }

    async fn add_item(&self, _collection: &str, _data: Value) -> BackendResult<Value> {
        Err(BackendError::NotImplemented)
    }

    async fn update_item(&self, _collection: &str, _data: Value) -> BackendResult<Value> {
        Err(BackendError::NotImplemented)
    }

    async fn delete_item(&self, _collection: &str, _key: Value) -> BackendResult<()> {
        Err(BackendError::NotImplemented)
    }
}

#[async_trait]
impl SpeechApi for StubBackend {
    async fn speech_to_text(&self, _audio_ref: &str) -> BackendResult<Transcription> {
        Err(BackendError::NotImplemented)
    }

    async fn text_to_speech(
        &self,
        _text: &str,
        _options: &VoiceOptions,
    ) -> BackendResult<SpeechAudio> {
        Err(BackendError::NotImplemented)
    }
}

#[async_trait]
impl ChatApi for StubBackend {
    async fn complete(&self, _request: &ChatRequest) -> BackendResult<String> {
        Err(BackendError::NotImplemented)
    }
}
