//! Base64 helpers for attachment payloads.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encodes data as standard, padded Base64 without line breaks.
///
/// This is the form the provider expects in attachment `content` fields.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// Whitespace is ignored so that wrapped input is accepted.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_encode() {
        assert_eq!(encode_base64(b"Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
        assert_eq!(encode_base64(b""), "");
    }

    #[test]
    fn test_base64_decode_wrapped() {
        let decoded = decode_base64("SGVsbG8s\r\nIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_base64_decode_invalid() {
        assert!(decode_base64("not base64!").is_err());
    }
}
