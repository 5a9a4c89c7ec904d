//! Configuration resolution for gozero-ai
//!
//! The inference credential is resolved with ENV → TOML priority. Absence of
//! a credential is a valid operating mode (sample catalog only), not an error.

use gozero_common::config::TomlConfig;
use std::time::Duration;
use tracing::{info, warn};

pub const API_KEY_ENV: &str = "GOZERO_VISION_API_KEY";
pub const ENDPOINT_ENV: &str = "GOZERO_VISION_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 10;

/// Resolved inference settings, read-only after startup
#[derive(Debug, Clone, PartialEq)]
pub struct VisionConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub vision_model: String,
    pub chat_model: String,
    pub timeout: Duration,
    pub chat_timeout: Duration,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            chat_timeout: Duration::from_secs(DEFAULT_CHAT_TIMEOUT_SECS),
        }
    }
}

impl VisionConfig {
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().map(is_valid_key).unwrap_or(false)
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve inference settings from environment and TOML
pub fn resolve_vision_config(toml_config: &TomlConfig) -> VisionConfig {
    let section = &toml_config.vision;
    let defaults = VisionConfig::default();

    VisionConfig {
        api_key: resolve_api_key(section.api_key.as_deref()),
        endpoint: std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| section.endpoint.clone())
            .unwrap_or(defaults.endpoint),
        vision_model: section.vision_model.clone().unwrap_or(defaults.vision_model),
        chat_model: section.chat_model.clone().unwrap_or(defaults.chat_model),
        timeout: section
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout),
        chat_timeout: section
            .chat_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.chat_timeout),
    }
}

/// Resolve the inference API key
///
/// **Priority:** ENV → TOML. Whitespace-only values count as absent.
fn resolve_api_key(toml_key: Option<&str>) -> Option<String> {
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_key.filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Inference API key found in both environment and TOML. Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("Inference API key loaded from environment variable");
        return Some(key.trim().to_string());
    }

    if let Some(key) = toml_key {
        info!("Inference API key loaded from TOML config");
        return Some(key.trim().to_string());
    }

    info!(
        "Inference API key not configured; recognition runs on the sample catalog. \
         Set {} or [vision] api_key to enable live inference.",
        API_KEY_ENV
    );
    None
}
