//! Response body decoding.
//!
//! Fetched pages arrive as bytes. The charset comes from the response's
//! `Content-Type` header when it names one, otherwise from a `<meta>`
//! declaration near the top of the page, otherwise UTF-8. Undecodable
//! bytes become U+FFFD rather than errors.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// `charset=...` inside a `Content-Type` value or `<meta>` content attribute.
#[allow(clippy::expect_used)]
static CHARSET_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;>]+)"#).expect("valid regex")
});

/// `<meta charset="...">` or `<meta http-equiv=... content="...; charset=...">`.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s;>]+)"#).expect("valid regex")
});

/// Bytes of the page head searched for a `<meta>` declaration.
const SNIFF_LEN: usize = 1024;

/// Encoding named by a `Content-Type` header value, if any.
#[must_use]
pub fn encoding_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    let label = CHARSET_PARAM_RE.captures(content_type)?.get(1)?.as_str();
    Encoding::for_label(label.as_bytes())
}

/// Encoding declared by a `<meta>` tag in the first kilobyte of the page.
#[must_use]
pub fn encoding_from_meta(body: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_LEN)]);
    let label = META_CHARSET_RE.captures(&head)?.get(1)?.as_str().to_string();
    Encoding::for_label(label.as_bytes())
}

/// Decode a response body to UTF-8.
///
/// ```
/// use gp_scrape::encoding::decode_body;
///
/// let body = b"<html><body>Jerez de la Frontera</body></html>";
/// assert!(decode_body(body, Some("text/html; charset=UTF-8")).contains("Jerez"));
/// ```
#[must_use]
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(encoding_from_content_type)
        .or_else(|| encoding_from_meta(body))
        .unwrap_or(UTF_8);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(body).into_owned();
    }

    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_wins_over_meta() {
        let body =
            b"<html><head><meta charset=\"utf-8\"></head><body>Caf\xE9</body></html>";
        let text = decode_body(body, Some("text/html; charset=ISO-8859-1"));
        assert!(text.contains("Café"));
    }

    #[test]
    fn meta_charset_used_without_header_charset() {
        let body =
            b"<html><head><meta charset=\"windows-1252\"></head><body>\x93Mugello\x94</body></html>";
        let text = decode_body(body, Some("text/html"));
        assert!(text.contains("\u{201C}Mugello\u{201D}"));
    }

    #[test]
    fn http_equiv_declaration_is_recognized() {
        let body = br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#;
        assert_eq!(encoding_from_meta(body).map(Encoding::name), Some("windows-1252"));
    }

    #[test]
    fn defaults_to_utf8() {
        let body = "<p>Márquez</p>".as_bytes();
        assert_eq!(decode_body(body, None), "<p>Márquez</p>");
        assert!(encoding_from_content_type("application/json").is_none());
    }

    #[test]
    fn invalid_bytes_do_not_fail() {
        let text = decode_body(b"Assen \xFF\xFE TT", None);
        assert!(text.contains("Assen"));
        assert!(text.contains("TT"));
    }
}
