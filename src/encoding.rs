//! Byte-level input decoding.
//!
//! Pages arrive from the fetch collaborator (or a file) as raw bytes. They
//! are decoded to UTF-8 before parsing: a byte-order mark wins, then a
//! `<meta charset>` or `http-equiv="Content-Type"` declaration near the top
//! of the document, then UTF-8. Invalid sequences become U+FFFD rather than
//! failing the page.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use tracing::debug;

/// Bytes inspected for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// `charset=` inside any `<meta>` tag; covers both `<meta charset="x">` and
/// `content="text/html; charset=x"`.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?\bcharset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#)
        .expect("valid regex")
});

/// Charset label declared in the first [`SNIFF_LEN`] bytes, if any.
#[must_use]
pub fn declared_charset(bytes: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Pick the encoding for `bytes`: BOM, then declared charset, then UTF-8.
///
/// Unknown charset labels fall back to UTF-8.
#[must_use]
pub fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    declared_charset(bytes)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode HTML bytes to a UTF-8 string.
///
/// # Examples
///
/// ```
/// use rs_intelliscrape::encoding::decode_html;
///
/// let html = b"<meta charset=\"iso-8859-1\"><p>Caf\xE9</p>";
/// assert!(decode_html(html).contains("Café"));
/// ```
#[must_use]
pub fn decode_html(bytes: &[u8]) -> String {
    let encoding = sniff_encoding(bytes);
    // `decode` strips a matching BOM itself.
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(encoding = used.name(), "replaced malformed byte sequences while decoding");
    }
    text.into_owned()
}
