//! Conversation lifecycle policy.
//!
//! The conversation either continues from disk or is replaced with a fresh
//! system-seeded one. A reset happens when the list is empty or when the
//! state has gone untouched past the staleness window; both triggers produce
//! the same seeded shape, so an exchange always starts from exactly one
//! leading system message.

use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use std::fmt;
use tracing::debug;

use crate::core::config::Config;
use crate::core::constants::{staleness_window, DEFAULT_SYSTEM_PROMPT};
use crate::core::message::Message;

/// The user supplied no prompt text. Recoverable: show usage, touch nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyPromptError;

impl fmt::Display for EmptyPromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "empty prompt")
    }
}

impl StdError for EmptyPromptError {}

impl Config {
    /// True when the conversation has gone untouched past the staleness
    /// window and should be discarded rather than continued.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.updated_at + staleness_window() < now
    }

    /// Replace an empty or stale conversation with a fresh one holding the
    /// default persona message. Returns true when a reseed happened so the
    /// caller can echo the persona line.
    pub fn ensure_seeded(&mut self, now: DateTime<Utc>) -> bool {
        if !self.conversation.is_empty() && !self.is_stale(now) {
            return false;
        }

        if !self.conversation.is_empty() {
            debug!(
                messages = self.conversation.len(),
                "discarding stale conversation"
            );
        }
        self.conversation = vec![Message::system(DEFAULT_SYSTEM_PROMPT)];
        true
    }

    /// Append a user turn. The text is trimmed first; empty or
    /// whitespace-only input is rejected without mutating anything.
    pub fn append_user(&mut self, text: &str) -> Result<(), EmptyPromptError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EmptyPromptError);
        }

        self.conversation.push(Message::user(trimmed));
        Ok(())
    }

    /// Append an assistant turn. Never validated, even when empty; model
    /// output is recorded as-is.
    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.conversation.push(Message::assistant(text));
    }

    /// Reset to an empty conversation and refresh the timestamp. The caller
    /// persists immediately; clearing is a terminal user action.
    pub fn clear_conversation(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.conversation.clear();
    }

    /// Stamp a completed exchange before persisting.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
