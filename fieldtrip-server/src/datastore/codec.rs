//! Compression for stored itinerary payloads.
//!
//! Itineraries are stored as LZW-compressed JSON. The text's UTF-8 bytes
//! are coded into 16-bit LZW codes (big-endian), and the code stream is
//! base64-encoded so it survives a form post.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Dictionary size limit; every code fits in a `u16`.
const MAX_DICT: usize = 1 << 16;

/// Error decoding a stored payload.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("code stream has odd length {0}")]
    OddLength(usize),

    #[error("invalid code {code} at position {position}")]
    InvalidCode { code: u16, position: usize },

    #[error("decoded payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Compress `text` into a base64 string.
pub fn encode(text: &str) -> String {
    let mut dict: HashMap<Vec<u8>, u16> = (0..=255u8).map(|b| (vec![b], u16::from(b))).collect();
    let mut codes: Vec<u16> = Vec::new();
    let mut word: Vec<u8> = Vec::new();

    for &byte in text.as_bytes() {
        word.push(byte);
        if dict.contains_key(&word) {
            continue;
        }
        let last = word.pop().unwrap_or_default();
        codes.push(dict[&word]);
        if dict.len() < MAX_DICT {
            let next = dict.len() as u16;
            word.push(last);
            dict.insert(std::mem::take(&mut word), next);
        }
        word.clear();
        word.push(last);
    }
    if !word.is_empty() {
        codes.push(dict[&word]);
    }

    let bytes: Vec<u8> = codes.iter().flat_map(|c| c.to_be_bytes()).collect();
    STANDARD.encode(bytes)
}

/// Reverse [`encode`].
pub fn decode(encoded: &str) -> Result<String, CodecError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    if bytes.len() % 2 != 0 {
        return Err(CodecError::OddLength(bytes.len()));
    }
    let codes = bytes.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]]));

    let mut dict: Vec<Vec<u8>> = (0..=255u8).map(|b| vec![b]).collect();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len() * 2);
    let mut prev: Option<Vec<u8>> = None;

    for (position, code) in codes.enumerate() {
        let index = usize::from(code);
        let entry = match (&prev, dict.get(index)) {
            (_, Some(entry)) => entry.clone(),
            // The code being defined by this very step
            (Some(prev), None) if index == dict.len() => {
                let mut entry = prev.clone();
                entry.push(prev[0]);
                entry
            }
            _ => return Err(CodecError::InvalidCode { code, position }),
        };

        out.extend_from_slice(&entry);
        if let Some(mut prev) = prev.take() {
            if dict.len() < MAX_DICT {
                prev.push(entry[0]);
                dict.push(prev);
            }
        }
        prev = Some(entry);
    }

    Ok(String::from_utf8(out)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_text_compresses() {
        let text = r#"{"mode":"BUS"},{"mode":"BUS"},{"mode":"BUS"},{"mode":"BUS"}"#;
        let encoded = encode(text);
        let raw_len = STANDARD.encode(text).len();
        assert!(encoded.len() < raw_len, "{} >= {}", encoded.len(), raw_len);
        assert_eq!(decode(&encoded).unwrap(), text);
    }

    #[test]
    fn handles_self_referencing_code() {
        // "aaa..." makes the decoder meet a code before it is defined.
        let text = "a".repeat(50);
        assert_eq!(decode(&encode(&text)).unwrap(), text);
    }

    #[test]
    fn preserves_multibyte_text() {
        let text = "Gare de l'Est → Châtelet, Zürich HB 🚆";
        assert_eq!(decode(&encode(text)).unwrap(), text);
    }

    #[test]
    fn empty_text() {
        assert_eq!(encode(""), "");
        assert_eq!(decode("").unwrap(), "");
    }

    #[test]
    fn dictionary_cap_is_respected() {
        // Enough distinct sequences to fill the dictionary.
        let text: String = (0..40_000u32)
            .map(|i| char::from_u32(0x4E00 + (i * 7919) % 20_000).unwrap())
            .collect();
        assert_eq!(decode(&encode(&text)).unwrap(), text);
    }

    #[test]
    fn rejects_bad_base64() {
        assert!(matches!(decode("not base64!"), Err(CodecError::Base64(_))));
    }

    #[test]
    fn rejects_odd_length() {
        let encoded = STANDARD.encode([0u8, 65, 0]);
        assert!(matches!(decode(&encoded), Err(CodecError::OddLength(3))));
    }

    #[test]
    fn rejects_undefined_code() {
        let encoded = STANDARD.encode([0u8, 65, 4, 0]);
        assert!(matches!(
            decode(&encoded),
            Err(CodecError::InvalidCode {
                code: 1024,
                position: 1
            })
        ));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let encoded = STANDARD.encode([0u8, 0xFF]);
        assert!(matches!(decode(&encoded), Err(CodecError::Utf8(_))));
    }
}
