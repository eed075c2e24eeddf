//! Test doubles shared across modules

use async_trait::async_trait;
use mockall::mock;
use trendsignal_llm::{
    CompletionRequest, CompletionResponse, LLMProvider, Message, StopReason, TokenUsage,
};

mock! {
    pub Provider {}

    #[async_trait]
    impl LLMProvider for Provider {
        async fn complete(&self, request: CompletionRequest) -> trendsignal_llm::Result<CompletionResponse>;
        fn name(&self) -> &str;
    }
}

/// A successful completion carrying `text`
pub fn completion(text: &str) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant(text),
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage {
            input_tokens: 120,
            output_tokens: 40,
        },
    }
}
