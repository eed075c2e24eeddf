//! Report synthesis: format the analysis into a prompt and ask the completion provider

use std::sync::Arc;
use tracing::{debug, info, instrument};
use trendsignal_llm::{CompletionRequest, LLMError, LLMProvider, Message};

use crate::analysis::{IndicatorSnapshot, SentimentResult};
use crate::config::AppConfig;
use crate::error::{Result, SignalError};
use crate::prompts;
use crate::retry::RetryPolicy;

/// Model parameters and retry policy for completion calls
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub retry: RetryPolicy,
}

impl CompletionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.gemini_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            retry: config.retry_policy(),
        }
    }

    /// Send a request under the retry policy and return the non-blank text
    pub(crate) async fn complete(
        &self,
        provider: &dyn LLMProvider,
        request: CompletionRequest,
    ) -> Result<String> {
        let response = self
            .retry
            .execute("completion", || provider.complete(request.clone()))
            .await?;

        debug!(
            stop_reason = ?response.stop_reason,
            tokens = response.usage.total(),
            "Completion received"
        );

        let text = response.message.text().ok_or_else(|| {
            SignalError::from(LLMError::EmptyCompletion("response text is blank".to_string()))
        })?;
        Ok(text.to_string())
    }
}

/// Turns a snapshot and sentiment into a natural-language report
pub struct ReportSynthesizer {
    provider: Arc<dyn LLMProvider>,
    settings: CompletionSettings,
}

impl ReportSynthesizer {
    pub fn new(provider: Arc<dyn LLMProvider>, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    /// One fresh completion call; the response text is returned verbatim
    ///
    /// Non-success responses surface as [`SignalError::Upstream`], blocked or
    /// blank responses as [`SignalError::EmptyCompletion`].
    #[instrument(skip(self, snapshot, sentiment, headlines))]
    pub async fn synthesize(
        &self,
        ticker: &str,
        snapshot: &IndicatorSnapshot,
        sentiment: &SentimentResult,
        headlines: &str,
    ) -> Result<String> {
        let prompt = prompts::render_report(ticker, snapshot, sentiment, headlines)?;

        let request = CompletionRequest::builder(&self.settings.model)
            .system(prompts::STRATEGIST_SYSTEM)
            .add_message(Message::user(prompt))
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature)
            .build();

        let text = self.settings.complete(self.provider.as_ref(), request).await?;
        info!(chars = text.len(), "Report synthesized");
        Ok(text)
    }
}
