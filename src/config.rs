//! Run configuration
//!
//! Everything the pipeline needs is assembled once in `cli::execute` and passed down
//! explicitly. Credentials come from the process environment; the rest from
//! command-line flags.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::{Result, TranslateError};

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const GEMINI_BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Supported translation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum ProviderName {
    #[default]
    Gemini,
    #[value(name = "openai")]
    OpenAi,
}

impl ProviderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::Gemini => "gemini",
            ProviderName::OpenAi => "openai",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderName::Gemini => GEMINI_API_KEY_VAR,
            ProviderName::OpenAi => OPENAI_API_KEY_VAR,
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the document the provider is asked to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// The entire replacement locale file
    #[default]
    Full,
    /// Only added or changed keys, merged into the existing file
    Delta,
}

/// Model options shared by every provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderConfig {
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

impl ProviderConfig {
    pub fn new(model: Option<String>, temperature: Option<f32>) -> Result<Self> {
        if let Some(t) = temperature {
            if !(0.0..=1.0).contains(&t) {
                return Err(TranslateError::Config(format!(
                    "Temperature must be between 0 and 1, got {}",
                    t
                )));
            }
        }
        let model = model.filter(|m| !m.trim().is_empty());
        Ok(Self { model, temperature })
    }
}

/// API credentials and endpoint overrides read from the environment
#[derive(Clone, Default)]
pub struct Credentials {
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
    pub openai_base_url: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            gemini_api_key: get(GEMINI_API_KEY_VAR),
            openai_api_key: get(OPENAI_API_KEY_VAR),
            gemini_base_url: get(GEMINI_BASE_URL_VAR),
            openai_base_url: get(OPENAI_BASE_URL_VAR),
        }
    }

    /// API key for `provider`, or a `Config` error naming the variable to set
    pub fn api_key(&self, provider: ProviderName) -> Result<&str> {
        let key = match provider {
            ProviderName::Gemini => self.gemini_api_key.as_deref(),
            ProviderName::OpenAi => self.openai_api_key.as_deref(),
        };
        key.ok_or_else(|| {
            TranslateError::Config(format!(
                "{} is not set in the environment",
                provider.api_key_var()
            ))
        })
    }

    pub fn base_url(&self, provider: ProviderName) -> Option<&str> {
        match provider {
            ProviderName::Gemini => self.gemini_base_url.as_deref(),
            ProviderName::OpenAi => self.openai_base_url.as_deref(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("gemini_api_key", &mask(&self.gemini_api_key))
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("openai_base_url", &self.openai_base_url)
            .finish()
    }
}

/// Options for one orchestrator run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub locales_path: PathBuf,
    pub mode: OutputMode,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            locales_path: PathBuf::from("./locales"),
            mode: OutputMode::Full,
        }
    }
}
