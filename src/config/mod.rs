//! Configuration module for alchemist
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::{BackendSettings, GeneralSettings, InterviewSettings, Settings};
