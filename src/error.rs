// src/error.rs

//! Unified error handling for the expiry scanner.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Inventory file missing from every candidate location
    #[error("Inventory file '{file}' not found (searched: {})", display_paths(.searched))]
    SourceNotFound { file: String, searched: Vec<PathBuf> },

    /// Inventory file exists but could not be read as a table
    #[error("Failed to read inventory file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Alert delivery failed
    #[error("Notification error: {0}")]
    Notification(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a source-not-found error listing every searched path.
    pub fn source_not_found(file: impl Into<String>, searched: Vec<PathBuf>) -> Self {
        Self::SourceNotFound {
            file: file.into(),
            searched,
        }
    }

    /// Create a parse error, keeping the underlying message.
    pub fn parse(path: impl AsRef<Path>, message: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Create a notification error.
    pub fn notification(message: impl fmt::Display) -> Self {
        Self::Notification(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
