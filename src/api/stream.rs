//! Streaming transport for chat completions.
//!
//! [`ChatStream`] wraps the SSE response body as a finite, non-restartable
//! pull-based sequence of text fragments. Each `next_fragment` call blocks
//! until the provider delivers data, the stream ends, or it fails; there is
//! no cancellation and no retry.

use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use memchr::memchr;
use std::error::Error as StdError;
use std::fmt;
use tracing::debug;

use crate::api::{ChatRequest, ChatResponse};
use crate::core::chat_stream::FragmentSource;
use crate::utils::url::construct_api_url;

/// Provider stream failure. Fatal for the invocation: fragments already
/// forwarded stay on screen, but nothing is committed to history.
#[derive(Debug)]
pub enum StreamError {
    /// The completion request could not be sent.
    Request { source: reqwest::Error },

    /// The provider answered with an error, either as a non-success HTTP
    /// status or as an in-band error payload on the stream.
    Api { message: String },

    /// The connection failed while the response body was being streamed.
    Transport { source: reqwest::Error },
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Request { source } => {
                write!(f, "Failed to send completion request: {source}")
            }
            StreamError::Api { message } => write!(f, "API error: {message}"),
            StreamError::Transport { source } => {
                write!(f, "Stream failed mid-transfer: {source}")
            }
        }
    }
}

impl StdError for StreamError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StreamError::Request { source } => Some(source),
            StreamError::Api { .. } => None,
            StreamError::Transport { source } => Some(source),
        }
    }
}

/// Pull the error summary out of a provider error payload. Providers vary
/// between `{"error": {"message": ...}}`, `{"error": "..."}` and a bare
/// `{"message": ...}`.
fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                serde_json::Value::Object(map) => map
                    .get("message")
                    .and_then(|message| message.as_str().map(str::to_owned)),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Condense an error body into a one-line diagnostic.
fn summarize_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();
    if trimmed.is_empty() {
        return "<empty error body>".to_string();
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&value) {
            if !summary.is_empty() {
                return summary;
            }
        }
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// What one SSE line contributed to the stream.
enum LineEvent {
    /// A text fragment to forward.
    Fragment(String),
    /// The `[DONE]` sentinel.
    End,
    /// Nothing usable: comment line, keep-alive, or a chunk without content.
    Skip,
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

/// Interpret one SSE line. Chunks with zero choices or no delta content are
/// skipped rather than treated as fatal; only an explicit error payload
/// fails the stream.
fn parse_sse_line(line: &str) -> Result<LineEvent, StreamError> {
    let Some(payload) = extract_data_payload(line) else {
        return Ok(LineEvent::Skip);
    };

    if payload == "[DONE]" {
        return Ok(LineEvent::End);
    }

    match serde_json::from_str::<ChatResponse>(payload) {
        Ok(response) => match response.choices.first() {
            Some(choice) => match &choice.delta.content {
                Some(content) => Ok(LineEvent::Fragment(content.clone())),
                None => Ok(LineEvent::Skip),
            },
            None => {
                debug!("skipping chunk with no choices");
                Ok(LineEvent::Skip)
            }
        },
        Err(_) => {
            if payload.trim().is_empty() {
                return Ok(LineEvent::Skip);
            }
            Err(StreamError::Api {
                message: summarize_api_error(payload),
            })
        }
    }
}

/// An open streaming completion. Created by [`ChatStream::open`]; drained by
/// pulling fragments until `Ok(None)`.
pub struct ChatStream {
    bytes: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    buffer: Vec<u8>,
    done: bool,
}

impl ChatStream {
    /// Open a streaming chat completion against an OpenAI-compatible
    /// endpoint. A non-success status is surfaced as [`StreamError::Api`]
    /// with the response body summarized.
    pub async fn open(
        client: &reqwest::Client,
        base_url: &str,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<Self, StreamError> {
        let chat_url = construct_api_url(base_url, "chat/completions");
        debug!(url = %chat_url, model = %request.model, "opening completion stream");

        let response = client
            .post(chat_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|source| StreamError::Request { source })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(StreamError::Api {
                message: format!("{status}: {}", summarize_api_error(&body)),
            });
        }

        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()))
            .boxed();
        Ok(Self {
            bytes,
            buffer: Vec::new(),
            done: false,
        })
    }

    #[cfg(test)]
    fn from_byte_stream(bytes: BoxStream<'static, reqwest::Result<Vec<u8>>>) -> Self {
        Self {
            bytes,
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Pull the next complete SSE line out of the buffer, if one is there.
    fn next_buffered_event(&mut self) -> Option<Result<LineEvent, StreamError>> {
        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            let event = match std::str::from_utf8(&self.buffer[..newline_pos]) {
                Ok(line) => parse_sse_line(line.trim()),
                Err(e) => {
                    debug!("skipping invalid UTF-8 in stream: {e}");
                    Ok(LineEvent::Skip)
                }
            };
            self.buffer.drain(..=newline_pos);

            match event {
                Ok(LineEvent::Skip) => continue,
                other => return Some(other),
            }
        }
        None
    }
}

#[async_trait::async_trait]
impl FragmentSource for ChatStream {
    async fn next_fragment(&mut self) -> Result<Option<String>, StreamError> {
        loop {
            if let Some(event) = self.next_buffered_event() {
                match event? {
                    LineEvent::Fragment(text) => return Ok(Some(text)),
                    LineEvent::End => {
                        self.done = true;
                        return Ok(None);
                    }
                    LineEvent::Skip => unreachable!("skip lines are consumed in the buffer scan"),
                }
            }

            if self.done {
                return Ok(None);
            }

            match self.bytes.next().await {
                // Connection closed without [DONE]; treat as natural end.
                None => {
                    self.done = true;
                    return Ok(None);
                }
                Some(Err(source)) => {
                    self.done = true;
                    return Err(StreamError::Transport { source });
                }
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
            }
        }
    }
}
