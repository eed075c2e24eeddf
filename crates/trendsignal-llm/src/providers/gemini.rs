//! Google Gemini provider implementation
//!
//! This module implements the LLMProvider trait for the Gemini
//! `models/{model}:generateContent` endpoint.
//! See: https://ai.google.dev/api/generate-content
//!
//! # Example
//!
//! ```no_run
//! use trendsignal_llm::{CompletionRequest, Message, LLMProvider};
//! use trendsignal_llm::providers::{GeminiConfig, GeminiProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeminiConfig::new("AIza...").with_timeout(30);
//!     let provider = GeminiProvider::with_config(config)?;
//!
//!     let request = CompletionRequest::builder("gemini-2.0-flash")
//!         .system("You are a concise market strategist.")
//!         .add_message(Message::user("Summarise RELIANCE.NS in one line."))
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, Role,
    StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the Gemini provider
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,

    /// Base URL (default: "https://generativelanguage.googleapis.com/v1beta")
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "Gemini API key must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.config.api_base)
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to Gemini API");

        let model = request.model.clone();
        let gemini_request = GenerateContentRequest::from(request);

        let response = self
            .client
            .post(self.endpoint(&model))
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&gemini_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 | 403 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(model),
                code => LLMError::RequestFailed {
                    status: code,
                    body: error_text,
                },
            });
        }

        let gemini_response: GenerateContentResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        gemini_response.into_completion()
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// Gemini wire types. Field names follow the REST JSON mapping (camelCase).

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }

    fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

impl From<CompletionRequest> for GenerateContentRequest {
    fn from(request: CompletionRequest) -> Self {
        // Gemini has no system role inside `contents`; fold system messages
        // into the system instruction after the explicit one.
        let mut system_parts: Vec<String> = request.system.into_iter().collect();
        let mut contents = Vec::with_capacity(request.messages.len());

        for Message { role, content } in request.messages {
            match role {
                Role::System => system_parts.push(content),
                Role::User => contents.push(Content::text(Some("user"), content)),
                Role::Assistant => contents.push(Content::text(Some("model"), content)),
            }
        }

        let system_instruction =
            (!system_parts.is_empty()).then(|| Content::text(None, system_parts.join("\n\n")));

        Self {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
                stop_sequences: request.stop_sequences,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

impl GenerateContentResponse {
    /// Branch a successful HTTP answer into text or `EmptyCompletion`
    fn into_completion(self) -> Result<CompletionResponse> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LLMError::EmptyCompletion(format!("prompt blocked ({reason})")));
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(LLMError::EmptyCompletion("no candidates returned".to_string()));
        };

        let finish_reason = candidate.finish_reason.unwrap_or_default();
        let text = candidate
            .content
            .map(|c| c.joined_text())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = if finish_reason.is_empty() {
                "candidate had no text".to_string()
            } else {
                format!("candidate had no text (finish reason {finish_reason})")
            };
            return Err(LLMError::EmptyCompletion(reason));
        }

        let stop_reason = match finish_reason.as_str() {
            "STOP" | "" => StopReason::EndTurn,
            "MAX_TOKENS" => StopReason::MaxTokens,
            other => {
                debug!("Unmapped finish reason: {}", other);
                StopReason::Other
            }
        };

        let usage = self
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        debug!(
            "Received response - stop_reason: {:?}, tokens: {}/{}",
            stop_reason, usage.input_tokens, usage.output_tokens
        );

        Ok(CompletionResponse {
            message: Message::assistant(text),
            stop_reason,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<CompletionResponse> {
        let response: GenerateContentResponse = serde_json::from_value(value).unwrap();
        response.into_completion()
    }

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(
            provider.endpoint("gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = GeminiProvider::new("   ");
        assert!(matches!(result, Err(LLMError::ConfigurationError(_))));
    }

    #[test]
    fn test_custom_base_trims_slash() {
        let config = GeminiConfig::new("k").with_api_base("http://localhost:8080/v1beta/");
        assert_eq!(config.api_base, "http://localhost:8080/v1beta");
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", GeminiConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_request_mapping() {
        let request = CompletionRequest::builder("gemini-2.0-flash")
            .system("persona")
            .add_message(Message::system("context"))
            .add_message(Message::user("hi"))
            .add_message(Message::assistant("hello"))
            .max_tokens(256)
            .temperature(0.3)
            .build();

        let body = serde_json::to_value(GenerateContentRequest::from(request)).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "persona\n\ncontext");
        assert_eq!(body["contents"].as_array().unwrap().len(), 2);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert!(body["generationConfig"].get("stopSequences").is_none());
    }

    #[test]
    fn test_successful_response() {
        let completion = parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Bullish "}, {"text": "bias."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 8}
        }))
        .unwrap();

        assert_eq!(completion.text(), "Bullish bias.");
        assert_eq!(completion.stop_reason, StopReason::EndTurn);
        assert_eq!(completion.usage.total(), 128);
    }

    #[test]
    fn test_blocked_prompt_is_empty_completion() {
        let err = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap_err();
        match err {
            LLMError::EmptyCompletion(reason) => assert!(reason.contains("SAFETY")),
            other => panic!("Expected EmptyCompletion, got {other:?}"),
        }
    }

    #[test]
    fn test_no_candidates_is_empty_completion() {
        let err = parse(json!({"candidates": []})).unwrap_err();
        assert!(matches!(err, LLMError::EmptyCompletion(_)));
    }

    #[test]
    fn test_safety_finish_without_text() {
        let err = parse(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap_err();
        match err {
            LLMError::EmptyCompletion(reason) => assert!(reason.contains("SAFETY")),
            other => panic!("Expected EmptyCompletion, got {other:?}"),
        }
    }

    #[test]
    fn test_max_tokens_keeps_text() {
        let completion = parse(json!({
            "candidates": [{
                "content": {"parts": [{"text": "truncated"}]},
                "finishReason": "MAX_TOKENS"
            }]
        }))
        .unwrap();
        assert_eq!(completion.stop_reason, StopReason::MaxTokens);
        assert_eq!(completion.usage, TokenUsage::default());
    }
}
