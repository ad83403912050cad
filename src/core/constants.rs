//! Shared constants used across the application

use chrono::Duration;

/// Upper bound on generated tokens per completion request.
pub const MAX_COMPLETION_TOKENS: u32 = 1500;

/// Sampling temperature; zero keeps answers deterministic.
pub const TEMPERATURE: f32 = 0.0;

/// Conversations untouched for longer than this are discarded and reseeded.
pub fn staleness_window() -> Duration {
    Duration::hours(24)
}

/// Persona message seeded at the head of every fresh conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You will be straight to the point and very concise.";

/// Model used when the configured model is empty.
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

/// OpenAI-compatible endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// File name of the persisted state in the user's home directory.
pub const CONFIG_FILE_NAME: &str = ".explain.json";
