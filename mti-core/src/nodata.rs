//! No-data field codec: the 1-byte kind + 8-byte value slot.

use crate::dtype::DType;
use crate::error::{MtiError, Result};

/// Serialize `value` (or its absence) into the 9-byte on-disk slot
/// (1 kind byte followed by 8 value bytes).
///
/// Kind `0` zeros all 8 value bytes. Kind `1` writes the scalar into a
/// `width`-byte window — the low bytes on little-endian, the high bytes
/// on big-endian — and zeros the padding on the other side.
pub fn encode_no_data(dtype: DType, little_endian: bool, value: Option<f64>) -> Result<[u8; 9]> {
    let mut out = [0u8; 9];
    match value {
        None => {
            out[0] = 0;
        }
        Some(v) => {
            if !v.is_finite() && !(dtype.is_float() && v.is_nan()) {
                return Err(MtiError::invalid_field(format!(
                    "no_data value {v} is not finite for {dtype:?}"
                )));
            }
            out[0] = 1;
            let width = dtype.width();
            let mut scratch = [0u8; 8];
            dtype.write(&mut scratch[..width], 0, v, little_endian)?;
            if little_endian {
                out[1..1 + width].copy_from_slice(&scratch[..width]);
            } else {
                out[1 + (8 - width)..9].copy_from_slice(&scratch[..width]);
            }
        }
    }
    Ok(out)
}

/// Deserialize the 9-byte on-disk slot.
///
/// Returns `Ok(None)` for kind `0` (after checking all 8 value bytes are
/// zero), or `Ok(Some(value))` for kind `1` (after checking the padding
/// bytes are zero and the decoded scalar is finite).
pub fn decode_no_data(dtype: DType, little_endian: bool, slot: &[u8; 9]) -> Result<Option<f64>> {
    let kind = slot[0];
    let value_bytes = &slot[1..9];
    match kind {
        0 => {
            if value_bytes.iter().any(|&b| b != 0) {
                return Err(MtiError::invalid_field(
                    "no_data kind is absent but value bytes are nonzero".to_string(),
                ));
            }
            Ok(None)
        }
        1 => {
            let width = dtype.width();
            let (pad, data) = if little_endian {
                (&value_bytes[width..8], &value_bytes[..width])
            } else {
                (&value_bytes[..8 - width], &value_bytes[8 - width..8])
            };
            if pad.iter().any(|&b| b != 0) {
                return Err(MtiError::invalid_field(
                    "no_data padding bytes must be zero".to_string(),
                ));
            }
            let mut scratch = [0u8; 8];
            scratch[..width].copy_from_slice(data);
            let value = dtype.read(&scratch[..width], 0, little_endian)?;
            if !value.is_finite() {
                return Err(MtiError::invalid_field(format!(
                    "decoded no_data value {value} is not finite"
                )));
            }
            Ok(Some(value))
        }
        other => Err(MtiError::invalid_field(format!(
            "no_data kind byte must be 0 or 1, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_roundtrip() {
        let slot = encode_no_data(DType::Uint16, true, None).unwrap();
        assert_eq!(slot, [0u8; 9]);
        assert_eq!(decode_no_data(DType::Uint16, true, &slot).unwrap(), None);
    }

    #[test]
    fn test_present_little_endian_known_vector() {
        // S5: little-endian uint16 no_data=0x1234 -> kind=1, bytes 34 12 00 00 00 00 00 00
        let slot = encode_no_data(DType::Uint16, true, Some(0x1234 as f64)).unwrap();
        assert_eq!(slot, [1, 0x34, 0x12, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            decode_no_data(DType::Uint16, true, &slot).unwrap(),
            Some(0x1234 as f64)
        );
    }

    #[test]
    fn test_present_big_endian_known_vector() {
        // S5: big-endian same dtype/value -> bytes 00 00 00 00 00 00 12 34
        let slot = encode_no_data(DType::Uint16, false, Some(0x1234 as f64)).unwrap();
        assert_eq!(slot, [1, 0, 0, 0, 0, 0, 0, 0x12, 0x34]);
        assert_eq!(
            decode_no_data(DType::Uint16, false, &slot).unwrap(),
            Some(0x1234 as f64)
        );
    }

    #[test]
    fn test_decode_rejects_nonzero_padding() {
        let mut slot = [1u8, 0x34, 0x12, 0, 0, 0, 0, 0, 0];
        slot[3] = 1; // pad byte on little-endian side for a 2-byte dtype
        let err = decode_no_data(DType::Uint16, true, &slot).unwrap_err();
        assert_eq!(err.code(), "INVALID_FIELD_VALUE");
    }

    #[test]
    fn test_decode_rejects_nonzero_value_bytes_when_absent() {
        let mut slot = [0u8; 9];
        slot[5] = 1;
        let err = decode_no_data(DType::Uint16, true, &slot).unwrap_err();
        assert_eq!(err.code(), "INVALID_FIELD_VALUE");
    }

    #[test]
    fn test_float64_uses_full_width_no_padding() {
        let slot = encode_no_data(DType::Float64, true, Some(3.5)).unwrap();
        assert_eq!(slot[0], 1);
        assert_eq!(decode_no_data(DType::Float64, true, &slot).unwrap(), Some(3.5));
    }
}
