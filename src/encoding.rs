//! Encoding detection and lenient UTF-8 decoding using simdutf8 and `encoding_rs`.

use std::borrow::Cow;

use simdutf8::basic::from_utf8;

/// Name reported for the only supported encoding.
pub const UTF8_NAME: &str = "utf-8";

/// Check if the given bytes are valid UTF-8.
///
/// Uses SIMD-accelerated validation for performance.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM (Byte Order Mark).
///
/// The UTF-8 BOM is the byte sequence: EF BB BF
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(&[0xEF, 0xBB, 0xBF])
}

/// Information about the detected encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingInfo {
    /// Whether the data (after any BOM) is valid UTF-8.
    pub is_utf8: bool,
    /// Whether a UTF-8 BOM was present.
    pub has_bom: bool,
}

impl EncodingInfo {
    /// Encoding name reported on the analysis result.
    pub const fn name(&self) -> &'static str {
        UTF8_NAME
    }
}

/// Detect BOM presence and UTF-8 validity.
pub fn detect_encoding(data: &[u8]) -> EncodingInfo {
    let has_bom = has_utf8_bom(data);
    let body = if has_bom { &data[3..] } else { data };

    EncodingInfo {
        is_utf8: is_utf8(body),
        has_bom,
    }
}

/// Decode the whole buffer as UTF-8, replacing invalid sequences.
///
/// A leading BOM is stripped from the decoded text. Valid input is borrowed
/// without copying.
pub fn decode_lenient(data: &[u8]) -> Cow<'_, str> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(data);
    if had_errors {
        tracing::debug!("replaced invalid UTF-8 sequences while decoding");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_utf8() {
        assert!(is_utf8(b"Hello, World!"));
        assert!(is_utf8("こんにちは".as_bytes()));
        assert!(is_utf8(b""));
        assert!(!is_utf8(&[0xFF, 0xFE]));
    }

    #[test]
    fn test_utf8_bom() {
        let with_bom = [0xEF, 0xBB, 0xBF, b'a', b'b', b'c'];

        assert!(has_utf8_bom(&with_bom));
        assert!(!has_utf8_bom(b"abc"));
        assert!(!has_utf8_bom(&[0xEF, 0xBB]));
    }

    #[test]
    fn test_detect_encoding() {
        let info = detect_encoding(b"Hello");
        assert!(info.is_utf8);
        assert!(!info.has_bom);
        assert_eq!(info.name(), "utf-8");

        let info = detect_encoding(&[0xEF, 0xBB, 0xBF, b'H', b'i']);
        assert!(info.is_utf8);
        assert!(info.has_bom);
    }

    #[test]
    fn test_decode_strips_bom() {
        let text = decode_lenient(&[0xEF, 0xBB, 0xBF, b'a', b',', b'b']);
        assert_eq!(text, "a,b");
    }

    #[test]
    fn test_decode_replaces_invalid_bytes() {
        let text = decode_lenient(&[b'a', 0xFF, b'b']);
        assert_eq!(text, "a\u{FFFD}b");
        assert!(matches!(decode_lenient(b"plain"), Cow::Borrowed(_)));
    }
}
