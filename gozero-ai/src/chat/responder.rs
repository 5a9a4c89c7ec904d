//! Chat reply generation with keyword fallback

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use super::{canned, ChatReply, ChatRequest};
use crate::config::VisionConfig;
use crate::recognition::{InferenceError, VisionClient};

const SYSTEM_PROMPT: &str = "You are GoZero, an AI assistant for sustainable waste management. \
Be helpful, informative, and encouraging about proper waste management, recycling, and \
sustainability practices. Reply in a friendly, conversational tone.";

/// One turn of a chat-completions conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &'static str, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A source of live chat replies
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, InferenceError>;
}

#[async_trait]
impl ChatBackend for VisionClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, InferenceError> {
        let body = json!({
            "model": self.chat_model(),
            "messages": messages,
        });
        self.post_chat_completion(&body, self.chat_timeout()).await
    }
}

/// Build the conversation sent to the text model
pub fn build_conversation(request: &ChatRequest) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::new("system", SYSTEM_PROMPT)];

    if let Some(item) = &request.scan_context {
        messages.push(ChatMessage::new(
            "user",
            format!(
                "I've just scanned a {} made of {}. It is {} and {}. \
                 The proper disposal instructions are: {}",
                item.item_name,
                item.material_type,
                if item.recyclable { "recyclable" } else { "not recyclable" },
                if item.reusable { "reusable" } else { "not reusable" },
                item.disposal_instructions
            ),
        ));
        messages.push(ChatMessage::new(
            "assistant",
            format!(
                "Thanks for scanning the {}! I can help you understand how to handle this item properly.",
                item.item_name
            ),
        ));
    }

    messages.push(ChatMessage::new("user", request.message.clone()));
    messages
}

/// Answers chat requests; never fails
pub struct ChatResponder {
    backend: Option<Arc<dyn ChatBackend>>,
    timeout: Duration,
}

impl ChatResponder {
    /// Keyword-only responder
    pub fn new(timeout: Duration) -> Self {
        Self {
            backend: None,
            timeout,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn ChatBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn from_config(config: &VisionConfig) -> Result<Self, InferenceError> {
        let responder = Self::new(config.chat_timeout);
        if !config.has_credential() {
            return Ok(responder);
        }
        Ok(responder.with_backend(Arc::new(VisionClient::new(config)?)))
    }

    pub fn is_live(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn reply(&self, request: &ChatRequest) -> ChatReply {
        let Some(backend) = &self.backend else {
            return ChatReply {
                message: canned::reply(request),
            };
        };

        let conversation = build_conversation(request);
        let outcome = match tokio::time::timeout(self.timeout, backend.complete(&conversation)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(InferenceError::UpstreamTimeout(self.timeout)),
        };

        match outcome {
            Ok(message) if !message.trim().is_empty() => ChatReply { message },
            Ok(_) => {
                tracing::warn!("Chat model returned empty content, using keyword reply");
                ChatReply {
                    message: canned::reply(request),
                }
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Chat model failed, using keyword reply");
                ChatReply {
                    message: canned::reply(request),
                }
            }
        }
    }
}
