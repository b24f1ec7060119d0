//! LLM provider abstraction
//!
//! A provider turns a prompt (plus an optional context file) into the raw text
//! the model returned. Every implementation owns its request format and its
//! response envelope; callers only ever see a plain `String`.
//!
//! # Example
//!
//! ```ignore
//! use ai_translate::config::{Credentials, ProviderConfig, ProviderName};
//! use ai_translate::provider::create_provider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(
//!         ProviderName::Gemini,
//!         &ProviderConfig::default(),
//!         &Credentials::from_env(),
//!     )?;
//!     let raw = provider
//!         .translate("Translate {\"hello\": \"Hello\"} into French", None)
//!         .await?;
//!     println!("{}", raw);
//!     Ok(())
//! }
//! ```

pub mod gemini;
pub mod mock;
pub mod openai;

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{Credentials, ProviderConfig, ProviderName};
use crate::error::{Result, TranslateError};

pub use gemini::GeminiProvider;
pub use mock::{MockCall, MockMode, MockProvider};
pub use openai::OpenAiProvider;

/// Temperature used when the caller does not supply one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Generic trait for LLM translation backends
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short backend identifier used in logs (e.g. "gemini", "openai")
    fn name(&self) -> &str;

    /// Send `prompt` to the model and return its raw text answer
    ///
    /// `context_path` points at the current target locale file. A missing
    /// file is not an error; the request is simply sent without context.
    ///
    /// # Errors
    ///
    /// * `ContextRead` - the context file exists but cannot be read
    /// * `Transport` - network failure or non-2xx status
    /// * `EmptyResponse` - no usable text in the response
    /// * `ContentBlocked` - the provider rejected the request on safety grounds
    async fn translate(&self, prompt: &str, context_path: Option<&Path>) -> Result<String>;
}

/// Construct the provider registered under `name`
///
/// Fails with `Config` if the provider's API key is missing, so credential
/// problems surface before any locale is processed.
pub fn create_provider(
    name: ProviderName,
    config: &ProviderConfig,
    credentials: &Credentials,
) -> Result<Box<dyn LlmProvider>> {
    let api_key = credentials.api_key(name)?.to_string();
    let base_url = credentials.base_url(name);

    let provider: Box<dyn LlmProvider> = match name {
        ProviderName::Gemini => {
            let mut provider = GeminiProvider::new(api_key, config)?;
            if let Some(url) = base_url {
                provider = provider.with_base_url(url);
            }
            Box::new(provider)
        }
        ProviderName::OpenAi => {
            let mut provider = OpenAiProvider::new(api_key, config)?;
            if let Some(url) = base_url {
                provider = provider.with_base_url(url);
            }
            Box::new(provider)
        }
    };

    debug!(provider = %name, "Provider initialized");
    Ok(provider)
}

/// Read the optional context file for a provider call
///
/// Returns `Ok(None)` when no path is given or the file does not exist.
pub async fn read_context(context_path: Option<&Path>) -> Result<Option<String>> {
    let Some(path) = context_path else {
        return Ok(None);
    };

    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Context file not found, sending without context");
            Ok(None)
        }
        Err(e) => Err(TranslateError::ContextRead {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// HTTP client shared by the remote providers
///
/// No explicit timeout and no idle connection pooling: each call opens its
/// own connection and releases it when done.
pub(crate) fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .map_err(|e| TranslateError::Transport(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-2xx response into a `Transport` error carrying status and body
pub(crate) async fn ensure_success(
    provider: ProviderName,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(TranslateError::Transport(format!(
        "{} API error {}: {}",
        provider, status, body
    )))
}

/// Whether a string holds anything besides whitespace
pub(crate) fn non_blank(text: &str) -> Option<&str> {
    if text.trim().is_empty() { None } else { Some(text) }
}
