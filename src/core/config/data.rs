use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::message::Message;

/// Persisted application state. One JSON document holds the credential, the
/// selected model, and the running conversation; disk is the sole durable
/// store between invocations.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub openai_api_key: String,
    /// Empty means "use the default model".
    pub model: String,
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub conversation: Vec<Message>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

impl Default for Config {
    fn default() -> Self {
        Config {
            openai_api_key: String::new(),
            model: "gpt-4".to_string(),
            updated_at: Utc::now(),
            conversation: Vec::new(),
        }
    }
}

impl Config {
    /// True when `updated_at` was never persisted (missing field or a
    /// pre-migration zero value).
    pub fn has_zero_timestamp(&self) -> bool {
        self.updated_at <= epoch()
    }

    /// Model to send to the provider, falling back to the default when the
    /// configured value is empty.
    pub fn effective_model(&self) -> &str {
        if self.model.is_empty() {
            crate::core::constants::DEFAULT_MODEL
        } else {
            &self.model
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_starts_with_empty_conversation() {
        let config = Config::default();
        assert!(config.conversation.is_empty());
        assert_eq!(config.model, "gpt-4");
        assert!(config.openai_api_key.is_empty());
        assert!(!config.has_zero_timestamp());
    }

    #[test]
    fn missing_timestamp_deserializes_as_zero() {
        let config: Config =
            serde_json::from_str(r#"{"openai_api_key":"k","model":"gpt-4"}"#).unwrap();
        assert!(config.has_zero_timestamp());
    }

    #[test]
    fn effective_model_falls_back_when_empty() {
        let mut config = Config::default();
        config.model.clear();
        assert_eq!(
            config.effective_model(),
            crate::core::constants::DEFAULT_MODEL
        );
        config.model = "gpt-3.5-turbo".to_string();
        assert_eq!(config.effective_model(), "gpt-3.5-turbo");
    }
}
