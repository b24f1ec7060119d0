//! OpenAI provider
//!
//! Uses the Responses API (`POST /responses`) in JSON mode. The context file
//! is appended to the prompt text since the endpoint takes a single input
//! string here.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::config::{ProviderConfig, ProviderName};
use crate::error::{Result, TranslateError};
use crate::provider::{
    DEFAULT_TEMPERATURE, LlmProvider, ensure_success, http_client, non_blank, read_context,
};

const CONTEXT_PREAMBLE: &str = "\n\nContext JSON file contents (do not echo this back except as part of the final JSON output):\n";

/// Longest envelope preview logged when a response has no usable text
const PREVIEW_CHARS: usize = 2000;

/// OpenAI provider
///
/// Talks to the Responses API with `text.format = json_object`, so the model
/// is held to a single JSON object answer.
#[derive(Clone)]
pub struct OpenAiProvider {
    /// API key sent as a bearer token
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// API root without trailing slash
    base_url: String,
    /// Model id, e.g. `gpt-5-nano`
    model: String,
    /// Sampling temperature in `[0, 1]`
    temperature: f32,
    /// Only sent when the caller chose a temperature; reasoning models reject it
    send_temperature: bool,
}

impl OpenAiProvider {
    pub const DEFAULT_MODEL: &'static str = "gpt-5-nano";
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    /// Create a provider with an explicit API key
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `config` - model and temperature; the temperature is only sent when
    ///   set here
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(TranslateError::Config)` - If the key is blank
    /// * `Err(TranslateError::Transport)` - If the HTTP client cannot be built
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::Config(
                "OpenAI API key cannot be empty".to_string(),
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
            send_temperature: config.temperature.is_some(),
        })
    }

    /// Point the provider at a different API root (Azure, proxies, test servers)
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
        format!("{}/responses", self.base_url)
    }

    fn request_body(&self, prompt: &str, context: Option<&str>) -> Value {
        let input = match context.and_then(non_blank) {
            Some(context) => format!("{}{}{}", prompt, CONTEXT_PREAMBLE, context),
            None => prompt.to_string(),
        };

        let mut body = json!({
            "model": self.model,
            "input": input,
            "text": { "format": { "type": "json_object" } }
        });
        if self.send_temperature {
            body["temperature"] = json!(self.temperature);
        }
        body
    }

    /// Pull the answer text out of a Responses (or Chat Completions) envelope
    ///
    /// Tried in order, first non-blank wins:
    /// 1. `output_text`
    /// 2. any `output[*].content[*].text`
    /// 3. `content[0].text`
    /// 4. `choices[0].message.content`
    ///
    /// A `refusal` item with no text anywhere is reported as `ContentBlocked`.
    pub fn extract_text(response: &Value) -> Result<String> {
        let from_output = || {
            response["output"].as_array().and_then(|outputs| {
                outputs
                    .iter()
                    .filter_map(|output| output["content"].as_array())
                    .flatten()
                    .filter_map(|item| item["text"].as_str())
                    .find_map(non_blank)
            })
        };

        let text = response["output_text"]
            .as_str()
            .and_then(non_blank)
            .or_else(from_output)
            .or_else(|| response["content"][0]["text"].as_str().and_then(non_blank))
            .or_else(|| {
                response["choices"][0]["message"]["content"]
                    .as_str()
                    .and_then(non_blank)
            });

        if let Some(text) = text {
            return Ok(text.to_string());
        }

        if let Some(refusal) = Self::find_refusal(response) {
            return Err(TranslateError::ContentBlocked {
                provider: ProviderName::OpenAi.to_string(),
                feedback: refusal,
            });
        }

        Err(TranslateError::EmptyResponse {
            provider: ProviderName::OpenAi.to_string(),
        })
    }

    fn find_refusal(response: &Value) -> Option<String> {
        let from_output = response["output"].as_array().and_then(|outputs| {
            outputs
                .iter()
                .filter_map(|output| output["content"].as_array())
                .flatten()
                .find(|item| item["type"] == "refusal")
                .map(|item| item["refusal"].as_str().unwrap_or("refused").to_string())
        });

        from_output.or_else(|| {
            response["choices"][0]["message"]["refusal"]
                .as_str()
                .map(str::to_string)
        })
    }

    fn log_preview(response: &Value) {
        let preview = serde_json::to_string_pretty(response).unwrap_or_default();
        let preview: String = preview.chars().take(PREVIEW_CHARS).collect();
        error!("OpenAI response (preview): {}", preview);
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        ProviderName::OpenAi.as_str()
    }

    async fn translate(&self, prompt: &str, context_path: Option<&Path>) -> Result<String> {
        let context = read_context(context_path).await?;
        let body = self.request_body(prompt, context.as_deref());

        debug!(model = %self.model, attached_context = context.is_some(), "Sending OpenAI request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(ProviderName::OpenAi, response).await?;

        let json: Value = response.json().await.map_err(|e| {
            TranslateError::Transport(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let result = Self::extract_text(&json);
        if matches!(result, Err(TranslateError::EmptyResponse { .. })) {
            Self::log_preview(&json);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_server::{closed_port, direct_client, serve_once};

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new("sk-test".to_string(), &ProviderConfig::default()).unwrap()
    }

    // ========== Initialization Tests ==========

    #[test]
    fn test_new_with_empty_key() {
        let result = OpenAiProvider::new(String::new(), &ProviderConfig::default());
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_defaults() {
        let provider = provider();
        assert_eq!(provider.model(), OpenAiProvider::DEFAULT_MODEL);
        assert_eq!(provider.endpoint(), "https://api.openai.com/v1/responses");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_debug_output() {
        let debug_str = format!("{:?}", provider());
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("sk-test"));
    }

    // ========== Request Body Tests ==========

    #[test]
    fn test_request_body_json_mode_without_temperature() {
        let body = provider().request_body("translate", None);
        assert_eq!(body["model"], "gpt-5-nano");
        assert_eq!(body["input"], "translate");
        assert_eq!(body["text"]["format"]["type"], "json_object");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_request_body_explicit_temperature() {
        let config = ProviderConfig::new(Some("gpt-4o-mini".to_string()), Some(0.25)).unwrap();
        let provider = OpenAiProvider::new("k".to_string(), &config).unwrap();
        let body = provider.request_body("translate", None);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], json!(0.25f32));
    }

    #[test]
    fn test_request_body_appends_context() {
        let body = provider().request_body("translate", Some(r#"{"hi":"Salut"}"#));
        let input = body["input"].as_str().unwrap();
        assert!(input.starts_with("translate\n\nContext JSON file contents"));
        assert!(input.ends_with(r#"{"hi":"Salut"}"#));
    }

    // ========== Extraction Tests ==========

    #[test]
    fn test_extract_output_text() {
        let response = json!({ "output_text": "{\"a\":\"b\"}" });
        assert_eq!(OpenAiProvider::extract_text(&response).unwrap(), "{\"a\":\"b\"}");
    }

    #[test]
    fn test_extract_output_content_skips_reasoning() {
        let response = json!({
            "output": [
                { "type": "reasoning", "summary": [] },
                { "type": "message", "content": [
                    { "type": "output_text", "text": "" },
                    { "type": "output_text", "text": "{\"x\":\"y\"}" }
                ] }
            ]
        });
        assert_eq!(OpenAiProvider::extract_text(&response).unwrap(), "{\"x\":\"y\"}");
    }

    #[test]
    fn test_extract_blank_output_text_falls_through() {
        let response = json!({
            "output_text": "  ",
            "output": [{ "content": [{ "text": "{}" }] }]
        });
        assert_eq!(OpenAiProvider::extract_text(&response).unwrap(), "{}");
    }

    #[test]
    fn test_extract_top_level_content() {
        let response = json!({ "content": [{ "type": "text", "text": "{\"k\":1}" }] });
        assert_eq!(OpenAiProvider::extract_text(&response).unwrap(), "{\"k\":1}");
    }

    #[test]
    fn test_extract_chat_completions_shape() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "{\"c\":\"d\"}" } }]
        });
        assert_eq!(OpenAiProvider::extract_text(&response).unwrap(), "{\"c\":\"d\"}");
    }

    #[test]
    fn test_extract_refusal_is_blocked() {
        let response = json!({
            "output": [{ "type": "message", "content": [
                { "type": "refusal", "refusal": "I can't help with that." }
            ] }]
        });
        match OpenAiProvider::extract_text(&response) {
            Err(TranslateError::ContentBlocked { provider, feedback }) => {
                assert_eq!(provider, "openai");
                assert_eq!(feedback, "I can't help with that.");
            }
            other => panic!("Expected ContentBlocked, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_chat_refusal_is_blocked() {
        let response = json!({
            "choices": [{ "message": { "content": null, "refusal": "No." } }]
        });
        assert!(matches!(
            OpenAiProvider::extract_text(&response),
            Err(TranslateError::ContentBlocked { .. })
        ));
    }

    #[test]
    fn test_extract_empty_envelope() {
        let response = json!({ "id": "resp_123", "output": [] });
        assert!(matches!(
            OpenAiProvider::extract_text(&response),
            Err(TranslateError::EmptyResponse { .. })
        ));
    }

    // ========== HTTP Tests ==========

    fn local_provider(base_url: &str) -> OpenAiProvider {
        provider().with_base_url(base_url).with_client(direct_client())
    }

    #[tokio::test]
    async fn test_translate_uses_bearer_auth_and_unwraps_envelope() {
        let (base_url, request) =
            serve_once("200 OK", r#"{"output_text": "{\"hello\": \"Bonjour\"}"}"#).await;
        let provider = local_provider(&base_url);

        let raw = provider.translate("prompt", None).await.unwrap();
        assert_eq!(raw, r#"{"hello": "Bonjour"}"#);

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /responses "));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer sk-test"));
    }

    #[tokio::test]
    async fn test_translate_error_status_carries_status_and_body() {
        let (base_url, _request) =
            serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let provider = local_provider(&base_url);

        match provider.translate("prompt", None).await {
            Err(TranslateError::Transport(msg)) => {
                assert!(msg.contains("500"), "missing status: {}", msg);
                assert!(msg.contains(r#"{"error":"boom"}"#), "missing body: {}", msg);
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translate_empty_envelope_is_empty_response() {
        let (base_url, _request) = serve_once("200 OK", r#"{"output": []}"#).await;
        let provider = local_provider(&base_url);
        let result = provider.translate("prompt", None).await;
        assert!(matches!(result, Err(TranslateError::EmptyResponse { .. })));
    }

    #[tokio::test]
    async fn test_translate_connection_refused_is_transport() {
        let provider = local_provider(&closed_port().await);
        let result = provider.translate("prompt", None).await;
        assert!(matches!(result, Err(TranslateError::Transport(_))));
    }

    #[tokio::test]
    async fn test_translate_unreadable_context_is_context_read() {
        let tmp = tempfile::TempDir::new().unwrap();
        let provider = local_provider(&closed_port().await);
        let result = provider.translate("prompt", Some(tmp.path())).await;
        assert!(matches!(result, Err(TranslateError::ContextRead { .. })));
    }

    // ========== Integration Tests (require real API key) ==========

    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored
    async fn test_real_api_translation() {
        let Ok(key) = std::env::var("OPENAI_API_KEY") else {
            eprintln!("Skipping: OPENAI_API_KEY not set");
            return;
        };

        let provider = OpenAiProvider::new(key, &ProviderConfig::default()).unwrap();
        let raw = provider
            .translate(
                "Translate the values of this JSON object into Spanish and return JSON only: {\"hello\": \"Hello\"}",
                None,
            )
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert!(parsed["hello"].is_string());
    }
}
