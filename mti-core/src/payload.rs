//! Bulk value <-> byte payload codec.
//!
//! Sample order is fixed: linear index `((row * cols) + col) * bands + band`,
//! with `row` outermost and `band` innermost.

use crate::dtype::DType;
use crate::error::{MtiError, Result};

/// Linear sample index for `(row, col, band)` within a `cols`-wide,
/// `bands`-deep grid.
pub fn sample_index(row: u64, col: u64, band: u64, cols: u64, bands: u64) -> u64 {
    ((row * cols) + col) * bands + band
}

/// Encode `values` into raw bytes under `(dtype, little_endian)`.
///
/// Fails with `INVALID_FIELD_VALUE` if `values.len() != expected_count`.
pub fn encode_samples(
    dtype: DType,
    little_endian: bool,
    values: &[f64],
    expected_count: u64,
) -> Result<Vec<u8>> {
    if values.len() as u64 != expected_count {
        return Err(MtiError::invalid_field(format!(
            "expected {expected_count} samples, got {}",
            values.len()
        )));
    }
    let width = dtype.width();
    let mut out = vec![0u8; values.len() * width];
    for (i, &v) in values.iter().enumerate() {
        dtype.write(&mut out, i * width, v, little_endian)?;
    }
    Ok(out)
}

/// Decode raw bytes into a sequence of scalars under `(dtype, little_endian)`.
///
/// Fails with `INVALID_FIELD_VALUE` if `bytes.len()` is not a multiple of
/// the dtype's byte width.
pub fn decode_samples(dtype: DType, little_endian: bool, bytes: &[u8]) -> Result<Vec<f64>> {
    let width = dtype.width();
    if bytes.len() % width != 0 {
        return Err(MtiError::invalid_field(format!(
            "payload length {} is not a multiple of dtype width {width}",
            bytes.len()
        )));
    }
    let count = bytes.len() / width;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        out.push(dtype.read(bytes, i * width, little_endian)?);
    }
    Ok(out)
}
