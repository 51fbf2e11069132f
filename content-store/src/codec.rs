//! File content travels as base64 of the UTF-8 bytes.

use crate::StoreError;
use base64::{Engine as _, engine::general_purpose::STANDARD};

pub fn encode_content(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decodes store content back to text.
///
/// The store wraps long payloads over several lines, so line breaks are
/// dropped before decoding.
pub fn decode_content(encoded: &str) -> Result<String, StoreError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r'))
        .collect();
    let bytes = STANDARD.decode(compact.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}
