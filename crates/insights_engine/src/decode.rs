use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use insights_logging::insights_warn;
use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// How far into the document a `<meta charset>` declaration is looked for.
const META_SNIFF_BYTES: usize = 1024;

static META_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_\-:.]+)"#)
        .expect("static meta charset pattern")
});

/// Decode a fetched page to UTF-8.
///
/// Order: byte-order mark, `Content-Type` charset, `<meta charset>` near the
/// top of the document, statistical detection. Malformed sequences become
/// U+FFFD.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(enc, _)| enc)
        .or_else(|| content_type.and_then(header_charset))
        .or_else(|| meta_charset(bytes))
        .unwrap_or_else(|| detect(bytes));

    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        insights_warn!("Page is not valid {}; malformed bytes replaced", actual.name());
    }
    text.into_owned()
}

fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches(['"', '\'']).as_bytes())
    })
}

fn meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let label = META_CHARSET.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes())
}

fn detect(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

#[cfg(test)]
mod tests {
    use super::decode_page;

    #[test]
    fn header_charset_wins_over_detection() {
        let decoded = decode_page(b"caf\xe9", Some("text/html; charset=ISO-8859-1"));
        assert_eq!(decoded, "caf\u{e9}");
    }

    #[test]
    fn bom_is_honoured_and_stripped() {
        let decoded = decode_page(b"\xEF\xBB\xBFhello", Some("text/html"));
        assert_eq!(decoded, "hello");
    }

    #[test]
    fn meta_charset_is_sniffed() {
        let page = b"<html><head><meta charset=\"windows-1252\"></head><body>caf\xe9</body></html>";
        let decoded = decode_page(page, Some("text/html"));
        assert!(decoded.contains("caf\u{e9}"));
    }

    #[test]
    fn plain_utf8_without_hints_decodes() {
        let decoded = decode_page("entitled “X”".as_bytes(), None);
        assert_eq!(decoded, "entitled “X”");
    }

    #[test]
    fn stray_byte_is_replaced_not_fatal() {
        let decoded = decode_page(b"<p>caf\xe9 au lait</p>", Some("text/html; charset=utf-8"));
        assert_eq!(decoded, "<p>caf\u{fffd} au lait</p>");
    }
}
