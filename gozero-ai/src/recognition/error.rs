//! Inference pipeline errors
//!
//! None of these reach the HTTP caller: the resolver absorbs every kind and
//! falls back to the sample catalog.

use std::time::Duration;
use thiserror::Error;

/// Longest upstream body excerpt carried in an error
pub const BODY_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum InferenceError {
    /// Client image payload is not usable base64 image data
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    /// No credential configured (the client must not be constructed)
    #[error("Inference credential not configured")]
    MissingCredential,

    /// Upstream did not answer within the configured timeout
    #[error("Upstream request timed out after {0:?}")]
    UpstreamTimeout(Duration),

    /// Upstream answered with a non-2xx status
    #[error("Upstream error {status}: {excerpt}")]
    UpstreamError { status: u16, excerpt: String },

    /// Connection-level failure (DNS, refused, reset, TLS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// 2xx response without a usable JSON object in the model output
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl InferenceError {
    /// Short stable label for logs and fallback reasons
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::InvalidPayload(_) => "invalid_payload",
            InferenceError::MissingCredential => "missing_credential",
            InferenceError::UpstreamTimeout(_) => "upstream_timeout",
            InferenceError::UpstreamError { .. } => "upstream_error",
            InferenceError::Transport(_) => "transport",
            InferenceError::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// First [`BODY_EXCERPT_CHARS`] characters of an upstream body
pub fn body_excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(500);
        let excerpt = body_excerpt(&long);
        assert_eq!(excerpt.chars().count(), BODY_EXCERPT_CHARS + 3);
        assert!(excerpt.ends_with("..."));

        assert_eq!(body_excerpt("  short body \n"), "short body");
    }

    #[test]
    fn test_error_display() {
        let err = InferenceError::UpstreamError {
            status: 503,
            excerpt: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream error 503: overloaded");
        assert_eq!(err.kind(), "upstream_error");
    }
}
