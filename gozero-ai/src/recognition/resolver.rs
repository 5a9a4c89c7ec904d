//! Recognition entry point: live inference with deterministic fallback
//!
//! Decision tree:
//! 1. Decode the payload; on failure sample from the raw payload bytes
//! 2. No credential configured: sample
//! 3. One bounded inference attempt; any failure or a result that breaks
//!    the shape invariants: sample from the decoded bytes
//!
//! `resolve` never fails.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::catalog::SampleCatalog;
use super::client::{InferenceBackend, VisionClient};
use super::codec;
use super::error::InferenceError;
use super::sampler::DeterministicSampler;
use super::types::RecognitionResult;
use crate::config::VisionConfig;

/// Why the sampler answered instead of the live model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoCredential,
    InvalidPayload,
    UpstreamTimeout,
    UpstreamError,
    Transport,
    MalformedResponse,
}

impl From<&InferenceError> for FallbackReason {
    fn from(err: &InferenceError) -> Self {
        match err {
            InferenceError::InvalidPayload(_) => FallbackReason::InvalidPayload,
            InferenceError::MissingCredential => FallbackReason::NoCredential,
            InferenceError::UpstreamTimeout(_) => FallbackReason::UpstreamTimeout,
            InferenceError::UpstreamError { .. } => FallbackReason::UpstreamError,
            InferenceError::Transport(_) => FallbackReason::Transport,
            InferenceError::MalformedResponse(_) => FallbackReason::MalformedResponse,
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FallbackReason::NoCredential => "no_credential",
            FallbackReason::InvalidPayload => "invalid_payload",
            FallbackReason::UpstreamTimeout => "upstream_timeout",
            FallbackReason::UpstreamError => "upstream_error",
            FallbackReason::Transport => "transport",
            FallbackReason::MalformedResponse => "malformed_response",
        };
        f.write_str(label)
    }
}

/// Which path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Live,
    Sampled(FallbackReason),
}

/// A result together with the path that produced it
#[derive(Debug, Clone)]
pub struct Resolution {
    pub result: RecognitionResult,
    pub source: ResolutionSource,
}

/// Orchestrates client and sampler
pub struct ResultResolver {
    backend: Option<Arc<dyn InferenceBackend>>,
    sampler: DeterministicSampler,
    timeout: Duration,
}

impl ResultResolver {
    /// Offline resolver: every call is answered by the sampler
    pub fn new(sampler: DeterministicSampler, timeout: Duration) -> Self {
        Self {
            backend: None,
            sampler,
            timeout,
        }
    }

    /// Attach a live inference backend
    pub fn with_backend(mut self, backend: Arc<dyn InferenceBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Build from resolved configuration
    ///
    /// Without a credential the resolver is permanently in sample-catalog mode.
    pub fn from_config(
        config: &VisionConfig,
        catalog: Arc<SampleCatalog>,
    ) -> Result<Self, InferenceError> {
        let resolver = Self::new(DeterministicSampler::new(catalog), config.timeout);

        if !config.has_credential() {
            tracing::info!("No inference credential configured, recognition uses the sample catalog");
            return Ok(resolver);
        }

        let client = VisionClient::new(config)?;
        tracing::info!(
            endpoint = %config.endpoint,
            model = %config.vision_model,
            timeout_secs = config.timeout.as_secs_f64(),
            "Live recognition enabled"
        );
        Ok(resolver.with_backend(Arc::new(client)))
    }

    /// True when a live backend is configured
    pub fn is_live(&self) -> bool {
        self.backend.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn sampler(&self) -> &DeterministicSampler {
        &self.sampler
    }

    /// Resolve an image payload to a canonical result. Never fails.
    pub async fn resolve(&self, image_base64: &str) -> RecognitionResult {
        self.resolve_detailed(image_base64).await.result
    }

    /// Like [`resolve`](Self::resolve), also reporting which path answered
    pub async fn resolve_detailed(&self, image_base64: &str) -> Resolution {
        let bytes = match codec::decode(image_base64) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Image payload could not be decoded, sampling from raw payload");
                return self.sample(image_base64.as_bytes(), FallbackReason::InvalidPayload);
            }
        };

        let Some(backend) = &self.backend else {
            tracing::debug!(bytes = bytes.len(), "No credential, sampling");
            return self.sample(&bytes, FallbackReason::NoCredential);
        };

        let outcome = self
            .infer_bounded(backend.as_ref(), &bytes)
            .await
            .and_then(|result| {
                result.check_invariants().map_err(|violation| {
                    InferenceError::MalformedResponse(format!(
                        "backend result violates shape invariants: {}",
                        violation
                    ))
                })?;
                Ok(result)
            });

        match outcome {
            Ok(result) => {
                tracing::info!(
                    backend = backend.name(),
                    item = %result.item_name,
                    category = %result.category,
                    "Live recognition succeeded"
                );
                Resolution {
                    result,
                    source: ResolutionSource::Live,
                }
            }
            Err(e) => {
                tracing::warn!(
                    backend = backend.name(),
                    kind = e.kind(),
                    error = %e,
                    "Live recognition failed, falling back to sample catalog"
                );
                self.sample(&bytes, FallbackReason::from(&e))
            }
        }
    }

    /// One inference attempt, abandoned after the configured timeout
    ///
    /// Dropping the timed-out future drops the in-flight request with it.
    async fn infer_bounded(
        &self,
        backend: &dyn InferenceBackend,
        bytes: &[u8],
    ) -> Result<RecognitionResult, InferenceError> {
        match tokio::time::timeout(self.timeout, backend.infer(bytes)).await {
            Ok(result) => result,
            Err(_) => Err(InferenceError::UpstreamTimeout(self.timeout)),
        }
    }

    fn sample(&self, bytes: &[u8], reason: FallbackReason) -> Resolution {
        Resolution {
            result: self.sampler.select(bytes),
            source: ResolutionSource::Sampled(reason),
        }
    }
}
