//! Follow-up chat grounded in the session's last scan

use std::sync::Arc;
use tracing::{info, instrument};
use trendsignal_llm::{CompletionRequest, LLMProvider, Message};

use crate::error::Result;
use crate::prompts;
use crate::report::CompletionSettings;
use crate::session::Session;

/// Answers free-text questions with the session history as context
pub struct ChatAssistant {
    provider: Arc<dyn LLMProvider>,
    settings: CompletionSettings,
}

impl ChatAssistant {
    pub fn new(provider: Arc<dyn LLMProvider>, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    /// Send the history plus `question`; the turn is recorded only on success
    #[instrument(skip(self, session, question), fields(session_id = %session.id, turns = session.turn_count()))]
    pub async fn reply(&self, session: &mut Session, question: &str) -> Result<String> {
        let context = prompts::render_chat_context(session.last_analysis.as_ref())?;
        let system = format!("{}\n\n{}", prompts::CHAT_SYSTEM, context.trim_end());

        let mut messages = session.messages();
        messages.push(Message::user(question));

        let request = CompletionRequest::builder(&self.settings.model)
            .system(system)
            .messages(messages)
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature)
            .build();

        let answer = self.settings.complete(self.provider.as_ref(), request).await?;
        session.push_turn(question, answer.clone());
        info!(chars = answer.len(), "Chat reply");
        Ok(answer)
    }
}
