//! Completion provider abstraction for trendsignal
//!
//! This crate keeps the dashboard independent of any single text-generation
//! service. It includes:
//!
//! - Message types for single and multi-turn prompts
//! - Completion request/response types
//! - The [`LLMProvider`] trait
//! - A Gemini `generateContent` provider (behind the `gemini` feature)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
