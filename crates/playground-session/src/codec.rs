//! Compact text encoding for share links: gzip, then base64.
//!
//! Links are written with the URL-safe alphabet and no padding. Reading is
//! tolerant: links made by older playground builds use the standard
//! alphabet with padding, and some chat clients turn `+` into a space.

use std::io::{Read, Write};

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::error::{Result, SessionError};

/// URL-safe alphabet, unpadded on write, padding optional on read.
const LINK_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Gzips `text` and encodes it as URL-safe base64.
pub fn encode_text(param: &'static str, text: &str) -> Result<String> {
    let compress = || -> std::io::Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes())?;
        encoder.finish()
    };
    let compressed = compress().map_err(|source| SessionError::Compression {
        operation: "compress",
        param,
        source,
    })?;
    Ok(LINK_ENGINE.encode(compressed))
}

/// Reverses [`encode_text`], accepting either base64 alphabet.
pub fn decode_text(param: &'static str, encoded: &str) -> Result<String> {
    let normalized = normalize_alphabet(encoded);
    let compressed = LINK_ENGINE
        .decode(normalized.as_bytes())
        .map_err(|source| SessionError::Base64 { param, source })?;

    let mut bytes = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut bytes)
        .map_err(|source| SessionError::Compression {
            operation: "decompress",
            param,
            source,
        })?;

    String::from_utf8(bytes).map_err(|source| SessionError::Utf8 { param, source })
}

/// Maps the standard alphabet (and `' '` for `'+'`) onto the URL-safe one.
fn normalize_alphabet(encoded: &str) -> String {
    encoded
        .trim()
        .chars()
        .map(|c| match c {
            '+' | ' ' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}
