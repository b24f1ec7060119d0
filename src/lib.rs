//! Translate i18n JSON locale files with an LLM
//!
//! The input is a git diff of the source-language file. For every target
//! locale the current translation is sent along as context, the model answers
//! with JSON, and the result is written back either as a whole file
//! ([`config::OutputMode::Full`]) or merged into the existing one
//! ([`config::OutputMode::Delta`]).

pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod locale;
pub mod merge;
pub mod orchestrator;
pub mod prompt;
pub mod provider;

/// Parsed content of one locale file. Key order follows the file.
pub type LocaleDocument = serde_json::Map<String, serde_json::Value>;

pub use config::{Credentials, OutputMode, ProviderConfig, ProviderName, RunOptions};
pub use error::{Result, TranslateError};
pub use merge::merge;
pub use orchestrator::{LocaleOutcome, Orchestrator, RunSummary};
pub use provider::{LlmProvider, create_provider};
