//! Transport encoding for binary payloads
//!
//! The inference endpoint embeds image bytes inside JSON request and
//! response bodies as standard base64 text.

use crate::error::{GenMediaError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Encode raw bytes as transport-safe text. Total: never fails.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode transport-encoded text back into raw bytes.
///
/// # Errors
/// - `MalformedPayload` if the input is not valid base64
pub fn decode(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| GenMediaError::malformed_payload(format!("invalid base64 payload: {e}")))
}
