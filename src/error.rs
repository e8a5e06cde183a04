//! Error types for Styre.

use thiserror::Error;

/// Library-level error type for Styre operations.
#[derive(Error, Debug)]
pub enum StyreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Origin not allowed: {0}")]
    InvalidOrigin(String),

    #[error("Unknown session: {0}")]
    UnknownSession(String),

    #[error("Session already exists: {0}")]
    SessionAlreadyExists(String),

    #[error("A notification stream is already attached to session {0}")]
    StreamAttached(String),

    #[error("Jira API error: {0}")]
    Jira(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Styre operations.
pub type Result<T> = std::result::Result<T, StyreError>;
