//! Payload text resolution
//!
//! Engines disagree on how they hand over payload text. Some give decoded
//! text only, some give bytes too, and some guess Latin-1 for byte-mode
//! payloads that were really written in a regional codepage. A
//! [`TextDecoder`] is the pluggable strategy for the re-decode; the fallback
//! chain never fails.

use std::fmt;

use encoding_rs::Encoding;

/// Strategy for decoding payload bytes that are not UTF-8
pub trait TextDecoder: Send + Sync + fmt::Debug {
    /// Strategy name for logs
    fn name(&self) -> &str;

    /// Decode `bytes`, or `None` if they are not valid in this encoding
    fn decode(&self, bytes: &[u8]) -> Option<String>;
}

/// A single-byte or multi-byte codepage from the WHATWG encoding registry
#[derive(Clone, Copy)]
pub struct Codepage {
    encoding: &'static Encoding,
}

impl Codepage {
    /// Look up an encoding by label, e.g. `"windows-1251"` or `"shift_jis"`
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(|encoding| Self { encoding })
    }
}

impl fmt::Debug for Codepage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Codepage").field(&self.encoding.name()).finish()
    }
}

impl TextDecoder for Codepage {
    fn name(&self) -> &str {
        self.encoding.name()
    }

    fn decode(&self, bytes: &[u8]) -> Option<String> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
    }
}

/// Text that is entirely Latin-1 with at least one high character, i.e. what
/// an engine produces when it guesses ISO-8859-1 for foreign bytes.
fn latin1_bytes(text: &str) -> Option<Vec<u8>> {
    let mut saw_high = false;
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        let code = u32::from(c);
        if code > 0xFF {
            return None;
        }
        saw_high |= code >= 0x80;
        bytes.push(code as u8);
    }
    saw_high.then_some(bytes)
}

/// Pick the payload text for a detection.
///
/// 1. Bytes that are not UTF-8 go through `decoder` first. Valid UTF-8
///    bytes are kept as the vendor reported them.
/// 2. Without bytes, Latin-1 looking vendor text is re-encoded and retried
///    through `decoder`.
/// 3. Otherwise the vendor text, then the bytes as UTF-8 (lossy), then `""`.
pub fn resolve_text(
    text: Option<&str>,
    bytes: Option<&[u8]>,
    decoder: Option<&dyn TextDecoder>,
) -> String {
    match (bytes, decoder) {
        (Some(bytes), _) if std::str::from_utf8(bytes).is_ok() => {
            // Valid UTF-8 payloads are never re-decoded.
        }
        (Some(bytes), Some(decoder)) => {
            if let Some(decoded) = decoder.decode(bytes) {
                return decoded;
            }
            tracing::debug!(
                decoder = decoder.name(),
                "payload bytes did not re-decode, keeping vendor text"
            );
        }
        (None, Some(decoder)) => {
            if let Some(decoded) = text
                .and_then(latin1_bytes)
                .and_then(|raw| decoder.decode(&raw))
            {
                return decoded;
            }
        }
        (Some(_), None) | (None, None) => {}
    }

    match (text, bytes) {
        (Some(text), _) => text.to_string(),
        (None, Some(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
        (None, None) => String::new(),
    }
}
