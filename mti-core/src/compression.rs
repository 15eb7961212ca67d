//! Compression adapter: identity passthrough or raw DEFLATE.
//!
//! `deflate_raw` uses `miniz_oxide`'s raw DEFLATE entry points (no zlib
//! header, no trailer) — the same crate the OpenEXR container format in
//! this retrieval pack reaches for to implement its own in-band zip
//! compression.

use crate::error::{MtiError, Result};
use serde::Serialize;

/// The two supported compression modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compression {
    None,
    DeflateRaw,
}

impl Compression {
    pub fn code(self) -> u8 {
        match self {
            Compression::None => 0,
            Compression::DeflateRaw => 1,
        }
    }

    pub fn from_code(code: u8) -> Result<Compression> {
        match code {
            0 => Ok(Compression::None),
            1 => Ok(Compression::DeflateRaw),
            other => Err(MtiError::invalid_field(format!(
                "unrecognized compression code: {other}"
            ))),
        }
    }
}

/// Whether this build can produce/consume `mode`. Always true today — raw
/// DEFLATE ships with the crate — but call sites route through this probe
/// rather than assuming availability, per the interface contract.
pub fn supported(_mode: Compression) -> bool {
    true
}

/// Compress `uncompressed` under `mode`, yielding the stored payload bytes.
pub fn encode(mode: Compression, uncompressed: &[u8]) -> Result<Vec<u8>> {
    if !supported(mode) {
        return Err(MtiError::UnsupportedCompression(format!("{mode:?}")));
    }
    match mode {
        Compression::None => Ok(uncompressed.to_vec()),
        Compression::DeflateRaw => Ok(miniz_oxide::deflate::compress_to_vec(uncompressed, 6)),
    }
}

/// Decompress `stored` under `mode` back into the uncompressed payload.
pub fn decode(mode: Compression, stored: &[u8], expected_len: u64) -> Result<Vec<u8>> {
    if !supported(mode) {
        return Err(MtiError::UnsupportedCompression(format!("{mode:?}")));
    }
    match mode {
        Compression::None => Ok(stored.to_vec()),
        Compression::DeflateRaw => {
            miniz_oxide::inflate::decompress_to_vec_with_limit(stored, expected_len as usize)
                .map_err(|e| MtiError::DecompressionFailed {
                    message: format!("{e:?}"),
                    cause: None,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let data = b"hello mesh tile".to_vec();
        let stored = encode(Compression::None, &data).unwrap();
        assert_eq!(stored, data);
        let back = decode(Compression::None, &stored, data.len() as u64).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_deflate_raw_roundtrip() {
        let data: Vec<u8> = (0u8..=255).chain(0u8..=255).collect();
        let stored = encode(Compression::DeflateRaw, &data).unwrap();
        let back = decode(Compression::DeflateRaw, &stored, data.len() as u64).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_deflate_raw_has_no_zlib_header() {
        // A raw deflate stream for this input must not start with the
        // zlib magic byte pair (0x78, ...).
        let data = vec![1u8, 2, 3, 4];
        let stored = encode(Compression::DeflateRaw, &data).unwrap();
        assert_ne!(stored.first().copied(), Some(0x78));
    }

    #[test]
    fn test_code_roundtrip() {
        assert_eq!(Compression::from_code(0).unwrap(), Compression::None);
        assert_eq!(
            Compression::from_code(1).unwrap(),
            Compression::DeflateRaw
        );
        assert!(Compression::from_code(2).is_err());
    }
}
