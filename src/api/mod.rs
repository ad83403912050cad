//! Chat-completions wire payloads for the OpenAI-compatible streaming API.

use serde::{Deserialize, Serialize};

use crate::core::message::Message;

#[derive(Serialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct ChatResponseDelta {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    pub delta: ChatResponseDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatResponseChoice>,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        ChatMessage {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

/// Map the stored conversation into API messages, preserving order.
pub fn to_api_messages(conversation: &[Message]) -> Vec<ChatMessage> {
    conversation.iter().map(ChatMessage::from).collect()
}

pub mod stream;
