//! Item recognition core
//!
//! Payload decoding, live inference, output repair, and the deterministic
//! sample-catalog fallback, orchestrated by [`ResultResolver`].

pub mod catalog;
pub mod client;
pub mod codec;
pub mod error;
pub mod normalizer;
pub mod resolver;
pub mod sampler;
pub mod types;

pub use catalog::{CatalogError, SampleCatalog};
pub use client::{InferenceBackend, VisionClient};
pub use error::InferenceError;
pub use resolver::{FallbackReason, Resolution, ResolutionSource, ResultResolver};
pub use sampler::DeterministicSampler;
pub use types::{EnvironmentalImpact, RecognitionResult, WasteCategory};
