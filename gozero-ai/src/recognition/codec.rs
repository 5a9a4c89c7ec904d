//! Image payload transport encoding
//!
//! Accepts bare base64 or `data:image/<fmt>;base64,` URIs from the client and
//! produces raw bytes. No resizing or recompression happens here.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use super::InferenceError;

/// Standard alphabet, padding optional on decode, canonical padding on encode
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const DATA_URI_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Decode a client image payload into raw bytes
///
/// Fails with `InvalidPayload` when the data URI is not an image, the body
/// is not valid base64, or it decodes to zero bytes.
pub fn decode(payload: &str) -> Result<Vec<u8>, InferenceError> {
    let body = strip_data_uri_prefix(payload.trim())?;

    // MIME-wrapped base64 carries line breaks
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| InferenceError::InvalidPayload(format!("not valid base64: {}", e)))?;

    if bytes.is_empty() {
        return Err(InferenceError::InvalidPayload(
            "payload decodes to zero bytes".to_string(),
        ));
    }

    Ok(bytes)
}

/// Return the base64 body of a payload, stripping a `data:` prefix if present
fn strip_data_uri_prefix(payload: &str) -> Result<&str, InferenceError> {
    let Some(rest) = payload.strip_prefix(DATA_URI_SCHEME) else {
        return Ok(payload);
    };

    let Some(marker) = rest.find(BASE64_MARKER) else {
        return Err(InferenceError::InvalidPayload(
            "data URI is not base64-encoded".to_string(),
        ));
    };

    let media_type = &rest[..marker];
    if !media_type.to_ascii_lowercase().starts_with("image/") {
        return Err(InferenceError::InvalidPayload(format!(
            "unsupported media type '{}'",
            media_type
        )));
    }

    Ok(&rest[marker + BASE64_MARKER.len()..])
}

/// Base64-encode raw bytes (standard alphabet, padded)
pub fn encode(bytes: &[u8]) -> String {
    LENIENT_BASE64.encode(bytes)
}

/// Re-encode raw image bytes as a data URI for the inference request
///
/// The media type is sniffed from magic bytes; unknown content is labelled
/// `image/jpeg`, matching what camera captures produce.
pub fn encode_data_uri(bytes: &[u8]) -> String {
    let mime = infer::get(bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(DEFAULT_IMAGE_MIME);

    format!("data:{}{}{}", mime, BASE64_MARKER, encode(bytes))
}
