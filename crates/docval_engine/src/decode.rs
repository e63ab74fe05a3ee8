use encoding_rs::{Encoding, UTF_8};

/// Decode a response body into text using: BOM -> Content-Type charset -> UTF-8.
///
/// Malformed sequences are replaced rather than rejected; a body that is not
/// valid JSON afterwards is handled by the report parser.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    decode_with(bytes, UTF_8)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> String {
    let (text, _, _) = enc.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8_without_header() {
        assert_eq!(decode_body(b"{\"a\":\"\xc3\xa9\"}", None), "{\"a\":\"é\"}");
    }

    #[test]
    fn charset_from_content_type() {
        // 0xE9 is "é" in windows-1252.
        let body = b"{\"error\":\"caf\xe9\"}";
        assert_eq!(
            decode_body(body, Some("application/json; Charset=\"windows-1252\"")),
            "{\"error\":\"café\"}"
        );
    }

    #[test]
    fn bom_wins_over_header() {
        let body = b"\xef\xbb\xbf[]";
        assert_eq!(decode_body(body, Some("text/plain; charset=iso-8859-1")), "[]");
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        assert_eq!(decode_body(b"ok\xff", None), "ok\u{fffd}");
    }
}
