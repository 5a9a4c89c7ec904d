//! Vision inference client
//!
//! Wraps an OpenAI-compatible chat-completions endpoint. The provider
//! envelope stays inside [`VisionClient`]; the resolver only sees the
//! [`InferenceBackend`] trait.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::codec;
use super::error::{body_excerpt, InferenceError};
use super::normalizer;
use super::types::RecognitionResult;
use crate::config::VisionConfig;

const USER_AGENT: &str = concat!("GoZero/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Instruction sent alongside the image
pub const RECOGNITION_PROMPT: &str = r#"Analyze this waste item image. Identify what it is and reply with ONLY a JSON object in exactly this format:
{
  "itemName": "Name of the item",
  "category": "One of: Plastic, Paper/Cardboard, Metal, Glass, E-Waste, Organic, Other",
  "recyclable": true or false,
  "reusable": true or false,
  "materialType": "Specific material type (e.g. PET plastic, aluminum)",
  "disposalInstructions": "Step by step instructions for proper disposal",
  "environmentalImpact": {
    "co2SavedKg": estimated CO2 saved in kg (number),
    "waterSavedL": estimated water saved in liters (number),
    "energySavedKWh": estimated energy saved in kWh (number),
    "description": "Brief fact about the environmental impact of recycling this item"
  }
}"#;

/// A source of live recognition results
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Backend identifier for logs
    fn name(&self) -> &'static str;

    /// Run one inference attempt on raw image bytes
    ///
    /// A single failed attempt is terminal; retries belong to the caller.
    async fn infer(&self, image: &[u8]) -> Result<RecognitionResult, InferenceError>;
}

/// OpenAI-compatible multimodal chat-completions client
pub struct VisionClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    vision_model: String,
    chat_model: String,
    timeout: Duration,
    chat_timeout: Duration,
}

impl VisionClient {
    /// Build a client from resolved configuration
    ///
    /// Fails with `MissingCredential` when no API key is configured; callers
    /// route straight to the sampler in that case.
    pub fn new(config: &VisionConfig) -> Result<Self, InferenceError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(InferenceError::MissingCredential)?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.timeout.max(config.chat_timeout))
            .build()
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key,
            vision_model: config.vision_model.clone(),
            chat_model: config.chat_model.clone(),
            timeout: config.timeout,
            chat_timeout: config.chat_timeout,
        })
    }

    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    pub fn chat_timeout(&self) -> Duration {
        self.chat_timeout
    }

    /// Request body for one image plus the fixed instruction
    pub fn recognition_request(&self, image: &[u8]) -> Value {
        json!({
            "model": self.vision_model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "image_url",
                            "image_url": { "url": codec::encode_data_uri(image) }
                        },
                        {
                            "type": "text",
                            "text": RECOGNITION_PROMPT
                        }
                    ]
                }
            ]
        })
    }

    /// POST a chat-completions body and return the assistant's text content
    pub(crate) async fn post_chat_completion(
        &self,
        body: &Value,
        timeout: Duration,
    ) -> Result<String, InferenceError> {
        tracing::debug!(endpoint = %self.endpoint, model = ?body.get("model"), "Calling inference endpoint");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, timeout))?;

        let status = response.status();
        tracing::debug!(status_code = status.as_u16(), "Inference endpoint responded");

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InferenceError::UpstreamError {
                status: status.as_u16(),
                excerpt: body_excerpt(&error_text),
            });
        }

        let payload: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::UpstreamTimeout(timeout)
            } else {
                InferenceError::MalformedResponse(format!("response body is not JSON: {}", e))
            }
        })?;

        extract_message_content(&payload).ok_or_else(|| {
            InferenceError::MalformedResponse(format!(
                "no message content in response: {}",
                body_excerpt(&payload.to_string())
            ))
        })
    }
}

#[async_trait]
impl InferenceBackend for VisionClient {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    async fn infer(&self, image: &[u8]) -> Result<RecognitionResult, InferenceError> {
        let body = self.recognition_request(image);
        let content = self.post_chat_completion(&body, self.timeout).await?;
        tracing::debug!(sample = %body_excerpt(&content), "Model content received");
        parse_recognition_content(&content)
    }
}

fn classify_reqwest_error(err: reqwest::Error, timeout: Duration) -> InferenceError {
    if err.is_timeout() {
        InferenceError::UpstreamTimeout(timeout)
    } else {
        InferenceError::Transport(err.to_string())
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response
///
/// Content may be a plain string or a list of `{type: "text", text}` parts.
pub fn extract_message_content(response: &Value) -> Option<String> {
    let content = response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))?;

    let text = match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(""),
        _ => return None,
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Locate, parse and normalize the JSON object in model output
pub fn parse_recognition_content(content: &str) -> Result<RecognitionResult, InferenceError> {
    let candidate = extract_json_candidate(content).ok_or_else(|| {
        InferenceError::MalformedResponse(format!(
            "no JSON object in model output: {}",
            body_excerpt(content)
        ))
    })?;

    let parsed: Value = serde_json::from_str(candidate)
        .map_err(|e| InferenceError::MalformedResponse(format!("JSON parse failed: {}", e)))?;

    if !parsed.is_object() {
        return Err(InferenceError::MalformedResponse(
            "model output JSON is not an object".to_string(),
        ));
    }

    Ok(normalizer::normalize(&parsed))
}

/// Find the JSON text in free-form model output
///
/// Prefers a ```json fenced block; otherwise the first balanced `{...}` region.
pub fn extract_json_candidate(content: &str) -> Option<&str> {
    fenced_json_block(content).or_else(|| first_balanced_object(content))
}

fn fenced_json_block(content: &str) -> Option<&str> {
    const OPEN: &str = "```json";
    const CLOSE: &str = "```";

    // ASCII lowercasing keeps byte offsets aligned with `content`
    let lowered = content.to_ascii_lowercase();
    let start = lowered.find(OPEN)? + OPEN.len();
    let len = content[start..].find(CLOSE)?;
    let inner = content[start..start + len].trim();

    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

fn first_balanced_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in content[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&content[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
