//! Character encoding detection and transcoding.
//!
//! Pricing pages are expected to be UTF-8, but exports frequently carry a
//! byte-order mark and older mirrors declare a legacy charset in a meta tag.
//! Both are handled here before the bytes reach the parser.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid regex")
});

/// Detect character encoding from HTML bytes.
///
/// Checks, in order:
/// 1. A byte-order mark (UTF-8, UTF-16LE, UTF-16BE)
/// 2. A `charset` declaration in a meta tag within the first 1024 bytes
/// 3. Defaults to UTF-8
///
/// Returns the encoding and the length of the BOM to skip.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> (&'static Encoding, usize) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(html) {
        return (encoding, bom_len);
    }

    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    let declared = CHARSET_META_RE
        .captures(&head_str)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()));

    (declared.unwrap_or(UTF_8), 0)
}

/// Decode HTML bytes to a UTF-8 string, dropping any byte-order mark.
///
/// Invalid sequences are replaced with U+FFFD rather than failing.
///
/// # Examples
///
/// ```
/// use rs_pricing_cms::encoding::decode_html;
///
/// let html = b"\xEF\xBB\xBF<html><body>\xE5\xAE\x9A\xE4\xBB\xB7</body></html>";
/// let text = decode_html(html);
/// assert!(text.starts_with("<html>"));
/// assert!(text.contains("定价"));
/// ```
#[must_use]
pub fn decode_html(html: &[u8]) -> String {
    let (encoding, bom_len) = detect_encoding(html);
    let body = &html[bom_len..];

    if encoding == UTF_8 {
        return String::from_utf8_lossy(body).into_owned();
    }

    let (decoded, _had_errors) = encoding.decode_without_bom_handling(body);
    decoded.into_owned()
}
