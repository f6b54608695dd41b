//! Opaque filter-value token codec.
//!
//! Filter tokens carry the value half of a filter string as standard
//! base64 so that values containing `.` or unicode survive URL plumbing
//! untouched. `decode` is the exact inverse of `encode`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Malformed filter token
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("filter token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded filter token is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Decode a filter-value token back to its original text
pub fn decode(token: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD.decode(token)?;
    Ok(String::from_utf8(bytes)?)
}

/// Encode a filter value into its opaque token form
pub fn encode(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}
