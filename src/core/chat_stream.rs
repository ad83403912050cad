//! Write-through accumulation of a completion stream.
//!
//! Fragments are forwarded to the sink the moment they arrive, in strict
//! receive order, while the same text is captured verbatim for persistence.
//! A stream failure aborts immediately: whatever was already forwarded stays
//! on screen, but the caller gets an error instead of a partial result to
//! commit.

use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt;
use std::io::Write;

use crate::api::stream::StreamError;

/// A finite, non-restartable sequence of response text fragments.
///
/// `Ok(None)` is natural end-of-stream; any `Err` is fatal for the
/// invocation. Each call blocks until the provider delivers data.
#[async_trait]
pub trait FragmentSource {
    async fn next_fragment(&mut self) -> Result<Option<String>, StreamError>;
}

#[derive(Debug)]
pub enum AccumulateError {
    /// The provider stream failed mid-transfer.
    Stream(StreamError),

    /// The output sink rejected a write.
    Sink(std::io::Error),
}

impl fmt::Display for AccumulateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccumulateError::Stream(source) => source.fmt(f),
            AccumulateError::Sink(source) => write!(f, "Failed to write response: {source}"),
        }
    }
}

impl StdError for AccumulateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AccumulateError::Stream(source) => Some(source),
            AccumulateError::Sink(source) => Some(source),
        }
    }
}

impl From<StreamError> for AccumulateError {
    fn from(source: StreamError) -> Self {
        AccumulateError::Stream(source)
    }
}

/// Drain `source`, echoing every fragment to `sink` as it arrives and
/// returning the full accumulated text on natural end-of-stream.
///
/// Each fragment is flushed immediately; that is what produces the typing
/// effect instead of one final dump.
pub async fn accumulate<S, W>(source: &mut S, sink: &mut W) -> Result<String, AccumulateError>
where
    S: FragmentSource + ?Sized,
    W: Write,
{
    let mut accumulated = String::new();

    while let Some(fragment) = source.next_fragment().await? {
        accumulated.push_str(&fragment);
        sink.write_all(fragment.as_bytes())
            .and_then(|_| sink.flush())
            .map_err(AccumulateError::Sink)?;
    }

    Ok(accumulated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted source: yields fragments in order, then the terminal event.
    struct ScriptedSource {
        fragments: VecDeque<String>,
        failure: Option<StreamError>,
    }

    impl ScriptedSource {
        fn ending(fragments: &[&str]) -> Self {
            Self {
                fragments: fragments.iter().map(|s| s.to_string()).collect(),
                failure: None,
            }
        }

        fn failing(fragments: &[&str], message: &str) -> Self {
            Self {
                fragments: fragments.iter().map(|s| s.to_string()).collect(),
                failure: Some(StreamError::Api {
                    message: message.to_string(),
                }),
            }
        }
    }

    #[async_trait]
    impl FragmentSource for ScriptedSource {
        async fn next_fragment(&mut self) -> Result<Option<String>, StreamError> {
            if let Some(fragment) = self.fragments.pop_front() {
                return Ok(Some(fragment));
            }
            match self.failure.take() {
                Some(err) => Err(err),
                None => Ok(None),
            }
        }
    }

    #[tokio::test]
    async fn forwarded_output_equals_accumulated_concatenation() {
        let mut source = ScriptedSource::ending(&["Hel", "lo", ", ", "world"]);
        let mut sink: Vec<u8> = Vec::new();

        let accumulated = accumulate(&mut source, &mut sink).await.unwrap();

        assert_eq!(accumulated, "Hello, world");
        assert_eq!(String::from_utf8(sink).unwrap(), "Hello, world");
    }

    #[tokio::test]
    async fn empty_stream_accumulates_to_empty_text() {
        let mut source = ScriptedSource::ending(&[]);
        let mut sink: Vec<u8> = Vec::new();

        let accumulated = accumulate(&mut source, &mut sink).await.unwrap();
        assert_eq!(accumulated, "");
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn failure_after_k_fragments_forwards_them_but_returns_no_text() {
        let mut source = ScriptedSource::failing(&["par", "tial"], "connection reset");
        let mut sink: Vec<u8> = Vec::new();

        let err = accumulate(&mut source, &mut sink).await.unwrap_err();

        // Already-forwarded fragments stay in the sink; the error carries
        // no accumulated text for the caller to commit.
        assert_eq!(String::from_utf8(sink).unwrap(), "partial");
        assert!(matches!(err, AccumulateError::Stream(StreamError::Api { .. })));
    }

    #[tokio::test]
    async fn sink_failures_surface_as_sink_errors() {
        struct FailingSink;
        impl Write for FailingSink {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut source = ScriptedSource::ending(&["x"]);
        let err = accumulate(&mut source, &mut FailingSink).await.unwrap_err();
        assert!(matches!(err, AccumulateError::Sink(_)));
    }
}
