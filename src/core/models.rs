//! Model selection against a fixed allow-list.
//!
//! Matching is exact and case-sensitive; a rejected identifier never touches
//! persisted state. Callers print [`format_model_list`] to guide correction.

use std::error::Error as StdError;
use std::fmt;

/// Model identifiers accepted by `--model`.
pub const KNOWN_MODELS: &[&str] = &[
    "gpt-4-32k-0613",
    "gpt-4-32k-0314",
    "gpt-4-32k",
    "gpt-4-0613",
    "gpt-4-0314",
    "gpt-4-turbo-preview",
    "gpt-4-vision-preview",
    "gpt-4",
    "gpt-3.5-turbo-1106",
    "gpt-3.5-turbo-0613",
    "gpt-3.5-turbo-0301",
    "gpt-3.5-turbo-16k",
    "gpt-3.5-turbo-16k-0613",
    "gpt-3.5-turbo",
    "gpt-3.5-turbo-instruct",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidModelError {
    pub requested: String,
}

impl fmt::Display for InvalidModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid model {:?}", self.requested)
    }
}

impl StdError for InvalidModelError {}

/// Validate a user-supplied model identifier against [`KNOWN_MODELS`].
pub fn validate(identifier: &str) -> Result<&'static str, InvalidModelError> {
    KNOWN_MODELS
        .iter()
        .find(|known| **known == identifier)
        .copied()
        .ok_or_else(|| InvalidModelError {
            requested: identifier.to_string(),
        })
}

/// Render the allow-list as a bulleted block for error output.
pub fn format_model_list() -> String {
    let mut out = String::new();
    for model in KNOWN_MODELS {
        out.push_str("  - ");
        out.push_str(model);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_known_identifiers() {
        assert_eq!(validate("gpt-4"), Ok("gpt-4"));
        assert_eq!(validate("gpt-3.5-turbo-16k-0613"), Ok("gpt-3.5-turbo-16k-0613"));
    }

    #[test]
    fn rejects_near_misses() {
        assert!(validate("gpt-4 ").is_err());
        assert!(validate("GPT-4").is_err());
        assert!(validate("gpt-5-mega").is_err());
        assert!(validate("").is_err());
    }

    #[test]
    fn validation_is_idempotent() {
        assert_eq!(validate("gpt-4"), validate("gpt-4"));
        assert_eq!(validate("gpt-5-mega"), validate("gpt-5-mega"));
    }

    #[test]
    fn model_list_names_every_known_model() {
        let listing = format_model_list();
        for model in KNOWN_MODELS {
            assert!(listing.contains(model));
        }
        assert_eq!(listing.lines().count(), KNOWN_MODELS.len());
    }
}
