use crate::fetcher::types::{Charset, PageResponse};
use bytes::Bytes;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Bytes scanned for `<meta>` charset declarations and fed to the detector.
const SNIFF_LEN: usize = 4096;

pub fn process_response(
    url: &str,
    url_final: Url,
    status: StatusCode,
    content_type: String,
    body_bytes: Bytes,
) -> PageResponse {
    let charset = detect_charset(&content_type, &body_bytes);
    let body_utf8 = decode_to_utf8(&body_bytes, &charset);

    PageResponse {
        url: url.to_string(),
        url_final,
        status,
        content_type,
        body_utf8,
        charset,
    }
}

fn charset_from_captures(regex: &Regex, haystack: &str) -> Option<Charset> {
    let name = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(name.as_bytes()).map(Charset::from_encoding)
}

pub fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    if let Some(charset) = charset_from_captures(&CHARSET_REGEX, content_type) {
        return charset;
    }

    let search_bytes = &body_bytes[..body_bytes.len().min(SNIFF_LEN)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(charset) = charset_from_captures(&META_CHARSET_REGEX, &search_str) {
        return charset;
    }

    if let Some(charset) = charset_from_captures(&META_HTTP_EQUIV_REGEX, &search_str) {
        return charset;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, search_bytes.len() == body_bytes.len());
    Charset::from_encoding(detector.guess(None, true))
}

/// Malformed sequences become U+FFFD; a page with a few bad bytes is still worth reading.
pub fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        debug!(
            encoding = encoding.name(),
            "body contained malformed sequences, replaced during decoding"
        );
    }

    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_charset_from_content_type() {
        let content_type = "text/html; charset=utf-8";
        let body = b"<html><head><title>Test</title></head></html>";

        assert_eq!(detect_charset(content_type, body), Charset::Utf8);
    }

    #[test]
    fn test_detect_charset_from_meta_tag() {
        let content_type = "text/html";
        let body = b"<html><head><meta charset=\"iso-8859-1\"><title>Test</title></head></html>";

        // encoding_rs maps ISO-8859-1 to its superset windows-1252
        assert_eq!(detect_charset(content_type, body), Charset::Windows1252);
    }

    #[test]
    fn test_detect_charset_from_meta_http_equiv() {
        let content_type = "text/html";
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"><title>Test</title></head></html>";

        assert_eq!(detect_charset(content_type, body), Charset::Windows1252);
    }

    #[test]
    fn test_decode_utf8() {
        let body = "Hello, 世界!".as_bytes();

        assert_eq!(decode_to_utf8(body, &Charset::Utf8), "Hello, 世界!");
    }

    #[test]
    fn test_decode_windows_1252() {
        let body = b"caf\xe9";

        assert_eq!(decode_to_utf8(body, &Charset::Windows1252), "café");
    }

    #[test]
    fn test_decode_replaces_malformed_bytes() {
        let body = b"ok \xff\xfe done";

        let decoded = decode_to_utf8(body, &Charset::Utf8);
        assert!(decoded.starts_with("ok "));
        assert!(decoded.ends_with(" done"));
        assert!(decoded.contains('\u{FFFD}'));
    }

    #[test]
    fn test_process_response_keeps_requested_url() {
        let page = process_response(
            "http://example.com/start",
            Url::parse("https://example.com/final").unwrap(),
            StatusCode::OK,
            "text/html; charset=utf-8".to_string(),
            Bytes::from_static(b"<p>hi</p>"),
        );

        assert_eq!(page.url, "http://example.com/start");
        assert_eq!(page.url_final.as_str(), "https://example.com/final");
        assert_eq!(page.body_utf8, "<p>hi</p>");
        assert_eq!(page.charset, Charset::Utf8);
    }
}
