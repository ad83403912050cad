//! Input utilities for assembling the prompt from command-line words.

/// Join positional arguments into one prompt, space-separated and trimmed.
///
/// Returns `None` when nothing usable remains, so the caller can show usage
/// before touching state or the network.
pub fn join_prompt_words<I, S>(words: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = words
        .into_iter()
        .map(|w| w.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_join_with_single_spaces() {
        assert_eq!(
            join_prompt_words(["what", "is", "a", "monad"]),
            Some("what is a monad".to_string())
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            join_prompt_words(["  hello ", "there  "]),
            Some("hello  there".to_string())
        );
    }

    #[test]
    fn empty_and_whitespace_only_input_yields_none() {
        assert_eq!(join_prompt_words(Vec::<String>::new()), None);
        assert_eq!(join_prompt_words(["", "  ", "\t"]), None);
    }
}
