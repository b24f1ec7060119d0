//! Mock provider for testing
//!
//! A deterministic, network-free `LlmProvider` for exercising the
//! orchestrator without API keys. Every call is recorded so tests can assert
//! on the prompts and context paths that were sent.
//!
//! # Example
//!
//! ```ignore
//! use ai_translate::provider::{LlmProvider, MockMode, MockProvider};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockProvider::new(MockMode::Fixed(r#"{"hello": "Bonjour"}"#.to_string()));
//!     let raw = mock.translate("prompt", None).await.unwrap();
//!     assert_eq!(raw, r#"{"hello": "Bonjour"}"#);
//!     assert_eq!(mock.calls().len(), 1);
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, TranslateError};
use crate::provider::{LlmProvider, read_context};

/// Canned behaviors for the mock provider
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Return the same payload for every call
    Fixed(String),

    /// Return a payload chosen by the context file stem ("fr" for `fr.json`);
    /// locales without an entry fail with a transport error
    PerLocale(HashMap<String, String>),

    /// Fail with a transport error
    Error(String),

    /// Fail as if the provider blocked the content
    Blocked(String),

    /// Answer with nothing
    Empty,
}

/// One recorded `translate` call
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub prompt: String,
    pub context_path: Option<PathBuf>,
    /// Context file content as the mock read it
    pub context: Option<String>,
}

#[derive(Debug)]
pub struct MockProvider {
    mode: MockMode,
    calls: Mutex<Vec<MockCall>>,
}

impl MockProvider {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Convenience for `MockMode::PerLocale`
    pub fn per_locale<I, K, V>(responses: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = responses
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(MockMode::PerLocale(map))
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn respond(&self, context_path: Option<&Path>) -> Result<String> {
        match &self.mode {
            MockMode::Fixed(payload) => Ok(payload.clone()),
            MockMode::PerLocale(map) => {
                let locale = context_path
                    .and_then(|p| p.file_stem())
                    .and_then(|s| s.to_str())
                    .unwrap_or_default();
                map.get(locale).cloned().ok_or_else(|| {
                    TranslateError::Transport(format!("mock: no response for locale '{}'", locale))
                })
            }
            MockMode::Error(msg) => Err(TranslateError::Transport(msg.clone())),
            MockMode::Blocked(feedback) => Err(TranslateError::ContentBlocked {
                provider: self.name().to_string(),
                feedback: feedback.clone(),
            }),
            MockMode::Empty => Err(TranslateError::EmptyResponse {
                provider: self.name().to_string(),
            }),
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(&self, prompt: &str, context_path: Option<&Path>) -> Result<String> {
        let context = read_context(context_path).await?;
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                prompt: prompt.to_string(),
                context_path: context_path.map(Path::to_path_buf),
                context,
            });
        }
        self.respond(context_path)
    }
}
