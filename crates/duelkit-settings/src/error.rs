//! Error types for profile loading and validation.

use std::io;

use thiserror::Error;

/// Errors that can occur while loading or validating a machine profile.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The profile file could not be read.
    #[error("Failed to read profile: {0}")]
    Io(#[from] io::Error),

    /// The profile file is not valid TOML.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The profile file is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The profile file extension is not recognized.
    #[error("Unknown profile extension: {0}")]
    UnknownExtension(String),

    /// The profile describes a machine the planner cannot operate.
    #[error("Invalid profile: {0}")]
    Validation(String),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
