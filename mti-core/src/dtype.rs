//! Numeric sample type registry.
//!
//! Eight scalar types, each with a fixed byte width, an integer-or-float
//! flag, an inclusive value range, and endian-aware scalar read/write.
//! Values travel through the codec as `f64`; integer dtypes are validated
//! for integrality and range on encode and are not range-checked on
//! decode (width and signedness already constrain them).

use crate::error::{MtiError, Result};
use serde::Serialize;

/// One of the eight enumerated numeric sample types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DType {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Float32,
    Float64,
}

impl DType {
    /// Byte width of one scalar.
    pub fn width(self) -> usize {
        match self {
            DType::Uint8 | DType::Int8 => 1,
            DType::Uint16 | DType::Int16 => 2,
            DType::Uint32 | DType::Int32 | DType::Float32 => 4,
            DType::Float64 => 8,
        }
    }

    /// True for float dtypes, false for integer dtypes.
    pub fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    /// Inclusive value range for encode-time validation.
    pub fn range(self) -> (f64, f64) {
        match self {
            DType::Uint8 => (0.0, u8::MAX as f64),
            DType::Int8 => (i8::MIN as f64, i8::MAX as f64),
            DType::Uint16 => (0.0, u16::MAX as f64),
            DType::Int16 => (i16::MIN as f64, i16::MAX as f64),
            DType::Uint32 => (0.0, u32::MAX as f64),
            DType::Int32 => (i32::MIN as f64, i32::MAX as f64),
            DType::Float32 => (f32::MIN as f64, f32::MAX as f64),
            DType::Float64 => (f64::MIN, f64::MAX),
        }
    }

    /// The 1-byte on-disk code for this dtype (spec.md §4.7).
    pub fn code(self) -> u8 {
        match self {
            DType::Uint8 => 0,
            DType::Int8 => 1,
            DType::Uint16 => 2,
            DType::Int16 => 3,
            DType::Uint32 => 4,
            DType::Int32 => 5,
            DType::Float32 => 6,
            DType::Float64 => 7,
        }
    }

    /// Resolve a dtype from its on-disk code.
    pub fn from_code(code: u8) -> Result<DType> {
        match code {
            0 => Ok(DType::Uint8),
            1 => Ok(DType::Int8),
            2 => Ok(DType::Uint16),
            3 => Ok(DType::Int16),
            4 => Ok(DType::Uint32),
            5 => Ok(DType::Int32),
            6 => Ok(DType::Float32),
            7 => Ok(DType::Float64),
            other => Err(MtiError::invalid_field(format!(
                "unrecognized dtype code: {other}"
            ))),
        }
    }

    /// Validate a scalar value for this dtype before encoding.
    ///
    /// NaN is permitted for float dtypes; every other non-finite value is
    /// rejected. Integer dtypes reject non-integral and out-of-range
    /// values.
    pub fn validate(self, value: f64) -> Result<()> {
        if value.is_nan() {
            return if self.is_float() {
                Ok(())
            } else {
                Err(MtiError::invalid_field(format!(
                    "NaN is not a valid {self:?} value"
                )))
            };
        }
        if !value.is_finite() {
            return Err(MtiError::invalid_field(format!(
                "non-finite value {value} for {self:?}"
            )));
        }
        if !self.is_float() && value.fract() != 0.0 {
            return Err(MtiError::invalid_field(format!(
                "non-integer value {value} for {self:?}"
            )));
        }
        let (min, max) = self.range();
        if value < min || value > max {
            return Err(MtiError::invalid_field(format!(
                "value {value} out of range [{min}, {max}] for {self:?}"
            )));
        }
        Ok(())
    }

    /// Read one scalar from `buf[offset..offset + width()]`.
    pub fn read(self, buf: &[u8], offset: usize, little_endian: bool) -> Result<f64> {
        let w = self.width();
        let bytes = buf.get(offset..offset + w).ok_or_else(|| {
            MtiError::internal(format!("read past end of buffer at offset {offset}"))
        })?;
        Ok(match self {
            DType::Uint8 => bytes[0] as f64,
            DType::Int8 => bytes[0] as i8 as f64,
            DType::Uint16 => read_u16(bytes, little_endian) as f64,
            DType::Int16 => read_u16(bytes, little_endian) as i16 as f64,
            DType::Uint32 => read_u32(bytes, little_endian) as f64,
            DType::Int32 => read_u32(bytes, little_endian) as i32 as f64,
            DType::Float32 => f32::from_bits(read_u32(bytes, little_endian)) as f64,
            DType::Float64 => f64::from_bits(read_u64(bytes, little_endian)),
        })
    }

    /// Write one scalar into `buf[offset..offset + width()]`.
    pub fn write(self, buf: &mut [u8], offset: usize, value: f64, little_endian: bool) -> Result<()> {
        self.validate(value)?;
        let w = self.width();
        let dst = buf.get_mut(offset..offset + w).ok_or_else(|| {
            MtiError::internal(format!("write past end of buffer at offset {offset}"))
        })?;
        match self {
            DType::Uint8 => dst[0] = value as u8,
            DType::Int8 => dst[0] = (value as i8) as u8,
            DType::Uint16 => write_u16(dst, value as u16, little_endian),
            DType::Int16 => write_u16(dst, (value as i16) as u16, little_endian),
            DType::Uint32 => write_u32(dst, value as u32, little_endian),
            DType::Int32 => write_u32(dst, (value as i32) as u32, little_endian),
            DType::Float32 => write_u32(dst, (value as f32).to_bits(), little_endian),
            DType::Float64 => write_u64(dst, value.to_bits(), little_endian),
        }
        Ok(())
    }
}

fn read_u16(b: &[u8], little_endian: bool) -> u16 {
    let arr = [b[0], b[1]];
    if little_endian {
        u16::from_le_bytes(arr)
    } else {
        u16::from_be_bytes(arr)
    }
}

fn write_u16(b: &mut [u8], value: u16, little_endian: bool) {
    let arr = if little_endian {
        value.to_le_bytes()
    } else {
        value.to_be_bytes()
    };
    b[..2].copy_from_slice(&arr);
}

fn read_u32(b: &[u8], little_endian: bool) -> u32 {
    let arr = [b[0], b[1], b[2], b[3]];
    if little_endian {
        u32::from_le_bytes(arr)
    } else {
        u32::from_be_bytes(arr)
    }
}

fn write_u32(b: &mut [u8], value: u32, little_endian: bool) {
    let arr = if little_endian {
        value.to_le_bytes()
    } else {
        value.to_be_bytes()
    };
    b[..4].copy_from_slice(&arr);
}

fn read_u64(b: &[u8], little_endian: bool) -> u64 {
    let mut arr = [0u8; 8];
    arr.copy_from_slice(&b[..8]);
    if little_endian {
        u64::from_le_bytes(arr)
    } else {
        u64::from_be_bytes(arr)
    }
}

fn write_u64(b: &mut [u8], value: u64, little_endian: bool) {
    let arr = if little_endian {
        value.to_le_bytes()
    } else {
        value.to_be_bytes()
    };
    b[..8].copy_from_slice(&arr);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width() {
        assert_eq!(DType::Uint8.width(), 1);
        assert_eq!(DType::Int16.width(), 2);
        assert_eq!(DType::Float32.width(), 4);
        assert_eq!(DType::Float64.width(), 8);
    }

    #[test]
    fn test_code_roundtrip() {
        for dtype in [
            DType::Uint8,
            DType::Int8,
            DType::Uint16,
            DType::Int16,
            DType::Uint32,
            DType::Int32,
            DType::Float32,
            DType::Float64,
        ] {
            assert_eq!(DType::from_code(dtype.code()).unwrap(), dtype);
        }
    }

    #[test]
    fn test_unknown_code_is_invalid_field() {
        let err = DType::from_code(200).unwrap_err();
        assert_eq!(err.code(), "INVALID_FIELD_VALUE");
    }

    #[test]
    fn test_validate_rejects_non_integer_for_int_dtype() {
        assert!(DType::Uint16.validate(1.5).is_err());
    }

    #[test]
    fn test_validate_allows_nan_for_float_dtype() {
        assert!(DType::Float32.validate(f64::NAN).is_ok());
        assert!(DType::Uint16.validate(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(DType::Uint8.validate(256.0).is_err());
        assert!(DType::Uint8.validate(-1.0).is_err());
        assert!(DType::Uint8.validate(255.0).is_ok());
    }

    #[test]
    fn test_write_read_roundtrip_little_endian() {
        let mut buf = [0u8; 2];
        DType::Uint16.write(&mut buf, 0, 258.0, true).unwrap();
        assert_eq!(buf, [2, 1]);
        assert_eq!(DType::Uint16.read(&buf, 0, true).unwrap(), 258.0);
    }

    #[test]
    fn test_write_read_roundtrip_big_endian() {
        let mut buf = [0u8; 2];
        DType::Uint16.write(&mut buf, 0, 258.0, false).unwrap();
        assert_eq!(buf, [1, 2]);
        assert_eq!(DType::Uint16.read(&buf, 0, false).unwrap(), 258.0);
    }

    #[test]
    fn test_negative_int16() {
        let mut buf = [0u8; 2];
        DType::Int16.write(&mut buf, 0, -5.0, true).unwrap();
        assert_eq!(DType::Int16.read(&buf, 0, true).unwrap(), -5.0);
    }

    #[test]
    fn test_float64_roundtrip() {
        let mut buf = [0u8; 8];
        DType::Float64.write(&mut buf, 0, 3.5, true).unwrap();
        assert_eq!(DType::Float64.read(&buf, 0, true).unwrap(), 3.5);
    }
}
