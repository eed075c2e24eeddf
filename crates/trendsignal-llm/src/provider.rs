//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for completion providers
///
/// Implementations turn a [`CompletionRequest`] into exactly one network call.
/// They never retry and never cache; callers own that policy.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion
    ///
    /// Returns [`LLMError::EmptyCompletion`](crate::LLMError::EmptyCompletion)
    /// when the service answers successfully but without usable text.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;
}
