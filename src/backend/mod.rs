//! Backend port for alchemist
//!
//! Auth, table storage, speech and chat capabilities consumed by the
//! containers, with swappable adapters.

mod client;
mod gemini;
mod memory;
pub mod prompts;
mod status;
mod stub;

pub use client::{
    build_backend, AuthApi, AuthUser, Backend, BackendError, BackendResult, ChatApi, ChatRequest,
    ChatRole, ChatTurn, ItemPage, ItemQuery, SpeechApi, SpeechAudio, TableApi, Transcription,
    VoiceOptions,
};
pub use gemini::GeminiBackend;
pub use memory::{MemoryBackend, MEMORY_OTP_CODE};
pub use status::RequestStatus;
pub use stub::StubBackend;
