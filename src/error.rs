//! Error types for bibler.

use std::path::PathBuf;

/// Errors that can occur while loading, searching or opening bibliography entries.
#[derive(Debug, thiserror::Error)]
pub enum BiblerError {
    /// The bibliography file does not exist or is not a regular file.
    #[error("Bibtex file not found '{}'", .0.display())]
    NotFound(PathBuf),

    /// Reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bibliography could not be parsed.
    #[error("Failed to parse bibliography: {0}")]
    Parse(String),

    /// An entry lacks a field required on this path.
    #[error("Entry '{key}' has no '{field}' field")]
    MissingField { key: String, field: String },

    /// A link is neither a local file nor a reachable URL.
    #[error("'{link}' is not a valid url or local file ({reason})")]
    InvalidTarget { link: String, reason: String },

    /// The interactive selection was not a valid index.
    #[error("Invalid selection '{input}': {reason}")]
    InvalidSelection { input: String, reason: String },

    /// The viewer process could not be started.
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from the terminal failed.
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file is not valid TOML.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for Results using [`BiblerError`].
pub type Result<T> = std::result::Result<T, BiblerError>;
