//! Recycling assistant chatbot
//!
//! Same availability contract as recognition: a live text model when a
//! credential is configured, keyword replies otherwise or on any failure.

pub mod canned;
pub mod responder;

use serde::{Deserialize, Serialize};

use crate::recognition::RecognitionResult;

pub use responder::{ChatBackend, ChatMessage, ChatResponder};

/// Incoming chatbot question, optionally about a scanned item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub scan_context: Option<RecognitionResult>,
}

/// Chatbot answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
}
