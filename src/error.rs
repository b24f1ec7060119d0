//! Error types for the translation pipeline
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    /// Missing or invalid configuration (API keys, temperature, provider name)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Locale code that cannot be used as a file name
    #[error("Invalid locale code: {0}")]
    InvalidLocale(String),

    /// File does not exist
    #[error("File not found at {}", path.display())]
    FileNotFound { path: PathBuf },

    /// File exists but could not be read
    #[error("Error reading file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not a valid locale document
    #[error("Invalid JSON in file {}: {message}", path.display())]
    FileParse { path: PathBuf, message: String },

    /// Context file for a provider call exists but could not be read
    #[error("Failed to read context file {}: {source}", path.display())]
    ContextRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network or HTTP failure talking to a provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered without any usable text
    #[error("{provider} API returned an empty or invalid response")]
    EmptyResponse { provider: String },

    /// Provider refused the request on safety grounds
    #[error("{provider} API request was blocked. Feedback: {feedback}")]
    ContentBlocked { provider: String, feedback: String },

    /// Provider output is not a JSON object
    #[error("Provider response is not a valid JSON object: {0}")]
    ResultParse(String),

    /// Locale file could not be written
    #[error("Error writing JSON to file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        TranslateError::Transport(err.to_string())
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslateError>;
