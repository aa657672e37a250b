//! alchemist - job search companion
//!
//! Mock interviews with scored history, profile and settings containers,
//! job aggregation and AI chat, all talking to a swappable backend port.
//! Resume scoring and job matching also run offline.

pub mod auth;
pub mod backend;
pub mod chat;
pub mod cli;
pub mod config;
pub mod interview;
pub mod jobs;
pub mod profile;
pub mod resume;
pub mod storage;

use thiserror::Error;

use crate::backend::BackendError;

/// Main error type for alchemist
#[derive(Error, Debug)]
pub enum AlchemistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No active interview session")]
    NoActiveSession,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AlchemistError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "alchemist";
