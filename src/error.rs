//! Error types for Icebreakr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Icebreakr
#[derive(Debug, Error)]
pub enum IcebreakrError {
    /// Profile directory query failed
    #[error("Directory error: {0}")]
    Directory(String),

    /// Settings store read failed
    #[error("Settings error: {0}")]
    Settings(String),

    /// Notification dispatch failed
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Invalid configuration value
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Icebreakr operations
pub type Result<T> = std::result::Result<T, IcebreakrError>;
