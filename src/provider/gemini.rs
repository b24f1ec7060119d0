//! Google Gemini provider
//!
//! Calls the `generateContent` endpoint of the Generative Language API. The
//! current locale file is attached as a base64 `inlineData` part next to the
//! prompt text, and the model is asked for an `application/json` response.
//!
//! # Authentication
//!
//! The API key is read from `GEMINI_API_KEY` and sent in the
//! `x-goog-api-key` header.

use std::path::Path;

use async_trait::async_trait;
use base64::engine::{Engine, general_purpose::STANDARD as BASE64};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::{ProviderConfig, ProviderName};
use crate::error::{Result, TranslateError};
use crate::provider::{
    DEFAULT_TEMPERATURE, LlmProvider, ensure_success, http_client, non_blank, read_context,
};

/// Finish reasons that mean the candidate was withheld rather than empty
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Google Gemini provider
///
/// Sends one `generateContent` request per locale and returns the text of the
/// first candidate.
#[derive(Clone)]
pub struct GeminiProvider {
    /// API key sent in the `x-goog-api-key` header
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// API root without trailing slash
    base_url: String,
    /// Model id, e.g. `gemini-2.5-flash`
    model: String,
    /// Sampling temperature in `[0, 1]`
    temperature: f32,
}

impl GeminiProvider {
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    /// Create a provider with an explicit API key
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key
    /// * `config` - model and temperature; unset values fall back to
    ///   `DEFAULT_MODEL` and `DEFAULT_TEMPERATURE`
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(TranslateError::Config)` - If the key is blank
    /// * `Err(TranslateError::Transport)` - If the HTTP client cannot be built
    ///
    /// # Example
    ///
    /// ```ignore
    /// let provider = GeminiProvider::new(key, &ProviderConfig::default())?;
    /// ```
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::Config(
                "Gemini API key cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            client: http_client()?,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        })
    }

    /// Point the provider at a different API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[cfg(test)]
    pub(crate) fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(&self, prompt: &str, context: Option<&str>) -> Value {
        let mut parts = vec![json!({ "text": prompt })];
        if let Some(context) = context.and_then(non_blank) {
            parts.push(json!({
                "inlineData": {
                    "mimeType": "text/plain",
                    "data": BASE64.encode(context)
                }
            }));
        }

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json",
                "thinkingConfig": { "thinkingBudget": 0 }
            }
        })
    }

    /// Pull the answer text out of a `generateContent` response
    ///
    /// Text parts of the first candidate are concatenated; thought parts are
    /// skipped. A prompt-level `blockReason`, or a blocking finish reason with
    /// no text, is reported as `ContentBlocked`.
    pub fn extract_text(response: &Value) -> Result<String> {
        let provider = ProviderName::Gemini.to_string();
        let feedback = &response["promptFeedback"];
        if !feedback["blockReason"].is_null() {
            return Err(TranslateError::ContentBlocked {
                provider,
                feedback: feedback.to_string(),
            });
        }

        let candidate = &response["candidates"][0];
        let text: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter(|part| !part["thought"].as_bool().unwrap_or(false))
                    .filter_map(|part| part["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();

        if non_blank(&text).is_some() {
            return Ok(text);
        }

        if let Some(reason) = candidate["finishReason"].as_str() {
            if BLOCKING_FINISH_REASONS.contains(&reason) {
                return Err(TranslateError::ContentBlocked {
                    provider,
                    feedback: json!({
                        "finishReason": reason,
                        "safetyRatings": candidate["safetyRatings"]
                    })
                    .to_string(),
                });
            }
        }

        Err(TranslateError::EmptyResponse { provider })
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        ProviderName::Gemini.as_str()
    }

    async fn translate(&self, prompt: &str, context_path: Option<&Path>) -> Result<String> {
        let context = read_context(context_path).await?;
        let body = self.request_body(prompt, context.as_deref());

        debug!(model = %self.model, attached_context = context.is_some(), "Sending Gemini request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(ProviderName::Gemini, response).await?;

        let json: Value = response.json().await.map_err(|e| {
            TranslateError::Transport(format!("Failed to parse Gemini response: {}", e))
        })?;

        Self::extract_text(&json)
    }
}
