use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::client::{
    AuthApi, AuthUser, BackendError, BackendResult, ChatApi, ChatRequest, ChatRole, ItemPage,
    ItemQuery, SpeechApi, SpeechAudio, TableApi, Transcription, VoiceOptions,
};
use crate::config::Settings;

const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Chat completion through Gemini. Auth, tables and speech have no
/// Gemini counterpart and report `NotImplemented`.
pub struct GeminiBackend {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiBackend {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.backend.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "Gemini API key is missing. Set backend.api_key in config or ALCHEMIST_GEMINI_API_KEY."
            );
        }

        let model = if settings.backend.model.trim().is_empty() {
            DEFAULT_GEMINI_MODEL.to_string()
        } else {
            settings.backend.model.trim().to_string()
        };

        let endpoint = if settings.backend.endpoint.trim().is_empty() {
            DEFAULT_GEMINI_ENDPOINT.to_string()
        } else {
            settings
                .backend
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(settings.backend.timeout_secs))
                .build()
                .context("Failed to build Gemini HTTP client")?,
            api_key,
            model,
            endpoint,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

fn build_request_body(request: &ChatRequest) -> GeminiGenerateContentRequest {
    let system_text: Vec<&str> = request
        .messages
        .iter()
        .filter(|turn| turn.role == ChatRole::System)
        .map(|turn| turn.content.as_str())
        .collect();

    let contents = request
        .messages
        .iter()
        .filter(|turn| turn.role != ChatRole::System)
        .map(|turn| GeminiContent {
            role: Some(
                match turn.role {
                    ChatRole::Assistant => "model",
                    _ => "user",
                }
                .to_string(),
            ),
            parts: vec![GeminiPart {
                text: turn.content.clone(),
            }],
        })
        .collect();

    GeminiGenerateContentRequest {
        contents,
        system_instruction: (!system_text.is_empty()).then(|| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: system_text.join("\n\n"),
            }],
        }),
        generation_config: request
            .temperature
            .map(|temperature| GeminiGenerationConfig { temperature }),
    }
}

#[async_trait]
impl ChatApi for GeminiBackend {
    async fn complete(&self, request: &ChatRequest) -> BackendResult<String> {
        let body = build_request_body(request);

        let response = self
            .http
            .post(self.request_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(format!("Gemini request failed: {}", e)))?;

        let response = response.error_for_status().map_err(|e| {
            BackendError::Transport(format!("Gemini returned an error status: {}", e))
        })?;

        let payload: GeminiGenerateContentResponse = response.json().await.map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse Gemini response: {}", e))
        })?;

        payload
            .candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                BackendError::InvalidResponse("Gemini response did not contain text".to_string())
            })
    }
}

#[async_trait]
impl AuthApi for GeminiBackend {
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
impl TableApi for GeminiBackend {
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
impl SpeechApi for GeminiBackend {
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiGenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}
