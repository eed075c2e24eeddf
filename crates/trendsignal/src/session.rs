//! Session-scoped state shared by the dashboard and the chat assistant
//!
//! A [`Session`] is owned by the presentation layer and passed by `&mut` into
//! each handler. Nothing here is global.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use trendsignal_llm::Message;
use uuid::Uuid;

use crate::analysis::{IndicatorSnapshot, SentimentResult};
use crate::market::QuoteSummary;

/// Chat turns kept per session; the oldest is dropped beyond this
pub const MAX_HISTORY_TURNS: usize = 50;

/// Result of the most recent successful scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastAnalysis {
    pub ticker: String,
    pub snapshot: IndicatorSnapshot,
    pub sentiment: SentimentResult,
    /// Joined headline text that was scored
    pub headlines: String,
    pub quote: Option<QuoteSummary>,
    /// Report text, absent when synthesis failed
    pub summary: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// One question and its answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub last_analysis: Option<LastAnalysis>,
    history: VecDeque<ChatTurn>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            last_analysis: None,
            history: VecDeque::new(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn update_activity(&mut self) {
        self.last_active = Utc::now();
    }

    /// Replace the last analysis
    pub fn record_analysis(&mut self, analysis: LastAnalysis) {
        self.last_analysis = Some(analysis);
        self.update_activity();
    }

    /// Append a completed turn, dropping the oldest past [`MAX_HISTORY_TURNS`]
    pub fn push_turn(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        if self.history.len() == MAX_HISTORY_TURNS {
            self.history.pop_front();
        }
        self.history.push_back(ChatTurn {
            question: question.into(),
            answer: answer.into(),
            at: Utc::now(),
        });
        self.update_activity();
    }

    pub fn history(&self) -> impl Iterator<Item = &ChatTurn> {
        self.history.iter()
    }

    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    /// History flattened into alternating user/assistant messages
    pub fn messages(&self) -> Vec<Message> {
        self.history
            .iter()
            .flat_map(|turn| {
                [
                    Message::user(turn.question.clone()),
                    Message::assistant(turn.answer.clone()),
                ]
            })
            .collect()
    }

    /// Clear the chat history; the last analysis is kept
    pub fn reset_chat(&mut self) {
        self.history.clear();
        self.update_activity();
    }

    /// Ticker of the last analysis, if any
    pub fn current_ticker(&self) -> Option<&str> {
        self.last_analysis.as_ref().map(|a| a.ticker.as_str())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
