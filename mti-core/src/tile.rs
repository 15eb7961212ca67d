//! Encode, decode, and inspect pipelines orchestrating the rest of the
//! codec (spec.md §4.8–§4.9).

use crate::compression::{self, Compression};
use crate::crc::crc32;
use crate::dtype::DType;
use crate::error::{MtiError, Result};
use crate::header::{Header, HEADER_LEN};
use crate::payload::{decode_samples, encode_samples};
use crate::tile_id::{normalize_tile_id, validate_tile_id_for_mesh_kind, MeshKind, TileIdInput};

/// Input to [`encode_tile`]: every scalar field of a Tile plus its values.
#[derive(Debug, Clone)]
pub struct EncodeInput<'a> {
    pub tile_id: TileIdInputOwned,
    pub mesh_kind: MeshKind,
    pub dtype: DType,
    pub little_endian: bool,
    pub compression: Option<Compression>,
    pub rows: u32,
    pub cols: u32,
    pub bands: u8,
    pub no_data: Option<f64>,
    pub values: &'a [f64],
}

/// An owned variant of [`TileIdInput`] so `EncodeInput` can be built
/// without borrowing a caller-local string.
#[derive(Debug, Clone)]
pub enum TileIdInputOwned {
    U64(u64),
    Str(String),
    I128(i128),
}

impl TileIdInputOwned {
    fn as_input(&self) -> TileIdInput<'_> {
        match self {
            TileIdInputOwned::U64(v) => TileIdInput::U64(*v),
            TileIdInputOwned::Str(s) => TileIdInput::Str(s.as_str()),
            TileIdInputOwned::I128(v) => TileIdInput::I128(*v),
        }
    }
}

/// Result of [`encode_tile`].
#[derive(Debug, Clone)]
pub struct EncodeOutput {
    pub bytes: Vec<u8>,
    pub header: Header,
}

/// Result of [`decode_tile`].
#[derive(Debug, Clone)]
pub struct DecodeOutput {
    pub header: Header,
    pub uncompressed_payload_bytes: Vec<u8>,
    pub decoded_values: Vec<f64>,
}

/// Result of [`inspect_tile`].
#[derive(Debug, Clone)]
pub struct InspectOutput {
    pub header: Header,
    pub header_length: usize,
    pub payload_offset: usize,
    pub payload_length: u64,
}

/// Encode a tile: normalize the tile id, validate every field, serialize
/// values, compress, checksum, and assemble the final byte buffer.
pub fn encode_tile(input: EncodeInput) -> Result<EncodeOutput> {
    let tile_id = normalize_tile_id(input.tile_id.as_input())?;
    validate_tile_id_for_mesh_kind(input.mesh_kind, tile_id)?;

    if input.rows == 0 || input.cols == 0 {
        return Err(MtiError::invalid_field(
            "rows and cols must be at least 1".to_string(),
        ));
    }
    if input.bands == 0 {
        return Err(MtiError::invalid_field(
            "bands must be at least 1".to_string(),
        ));
    }

    let sample_count = (input.rows as u64)
        .checked_mul(input.cols as u64)
        .and_then(|rc| rc.checked_mul(input.bands as u64))
        .ok_or_else(|| {
            MtiError::invalid_field(format!(
                "rows({}) * cols({}) * bands({}) overflows a u64 sample count",
                input.rows, input.cols, input.bands
            ))
        })?;
    if sample_count == 0 {
        return Err(MtiError::invalid_field(
            "sample_count must be positive".to_string(),
        ));
    }

    if let Some(nd) = input.no_data {
        if !nd.is_finite() && !(input.dtype.is_float() && nd.is_nan()) {
            return Err(MtiError::invalid_field(format!(
                "no_data value {nd} must be finite"
            )));
        }
    }

    let compression = input.compression.unwrap_or(Compression::None);

    let raw = encode_samples(input.dtype, input.little_endian, input.values, sample_count)?;
    let uncompressed_payload_length = raw.len() as u64;
    let expected_raw_length = sample_count
        .checked_mul(input.dtype.width() as u64)
        .ok_or_else(|| {
            MtiError::invalid_field("sample_count * dtype width overflows a u64".to_string())
        })?;
    if uncompressed_payload_length != expected_raw_length {
        return Err(MtiError::internal(
            "encoded payload length does not match sample_count * dtype width".to_string(),
        ));
    }

    let stored = compression::encode(compression, &raw)?;
    let compressed_payload_length = stored.len() as u64;
    let payload_crc32 = crc32(&raw);

    let header = Header {
        format_major: crate::header::FORMAT_MAJOR,
        tile_id,
        mesh_kind: input.mesh_kind,
        dtype: input.dtype,
        little_endian: input.little_endian,
        compression,
        rows: input.rows,
        cols: input.cols,
        bands: input.bands,
        no_data: input.no_data,
        uncompressed_payload_length,
        compressed_payload_length,
        payload_crc32,
        header_crc32: 0, // filled in by pack()
    };

    let packed = header.pack()?;
    let header_crc32 = u32::from_le_bytes(packed[54..58].try_into().unwrap());
    let header = Header {
        header_crc32,
        ..header
    };

    let mut bytes = Vec::with_capacity(HEADER_LEN + stored.len());
    bytes.extend_from_slice(&packed);
    bytes.extend_from_slice(&stored);

    Ok(EncodeOutput { bytes, header })
}

/// Parse the header and compute derived offsets/lengths without touching
/// the payload — no decompression, no payload CRC check.
pub fn inspect_tile(bytes: &[u8]) -> Result<InspectOutput> {
    let header = Header::parse(bytes)?;

    let declared_end = HEADER_LEN as u64 + header.compressed_payload_length;
    if (bytes.len() as u64) < declared_end {
        return Err(MtiError::InvalidPayloadLength(format!(
            "declared stored payload length {} exceeds available {} bytes",
            header.compressed_payload_length,
            bytes.len() - HEADER_LEN.min(bytes.len())
        )));
    }

    Ok(InspectOutput {
        payload_length: header.compressed_payload_length,
        header,
        header_length: HEADER_LEN,
        payload_offset: HEADER_LEN,
    })
}

/// Full decode: inspect, verify the declared payload fits the file,
/// decompress, verify lengths and the payload CRC, then decode scalars.
pub fn decode_tile(bytes: &[u8]) -> Result<DecodeOutput> {
    let inspected = inspect_tile(bytes)?;
    let header = inspected.header;

    if !compression::supported(header.compression) {
        return Err(MtiError::UnsupportedCompression(format!(
            "{:?}",
            header.compression
        )));
    }

    let stored = &bytes[inspected.payload_offset
        ..inspected.payload_offset + header.compressed_payload_length as usize];

    let uncompressed =
        compression::decode(header.compression, stored, header.uncompressed_payload_length)?;

    if uncompressed.len() as u64 != header.uncompressed_payload_length {
        return Err(MtiError::InvalidPayloadLength(format!(
            "decompressed length {} does not match header's uncompressed_payload_length {}",
            uncompressed.len(),
            header.uncompressed_payload_length
        )));
    }

    let computed_crc = crc32(&uncompressed);
    if computed_crc != header.payload_crc32 {
        return Err(MtiError::PayloadChecksumMismatch(format!(
            "computed {computed_crc:08x}, stored {:08x}",
            header.payload_crc32
        )));
    }

    let expected_bytes = header
        .sample_count()?
        .checked_mul(header.dtype.width() as u64)
        .ok_or_else(|| {
            MtiError::InvalidPayloadLength(
                "sample_count * dtype width overflows a u64".to_string(),
            )
        })?;
    if uncompressed.len() as u64 != expected_bytes {
        return Err(MtiError::InvalidPayloadLength(format!(
            "payload is {} bytes, expected sample_count * dtype width = {expected_bytes}",
            uncompressed.len()
        )));
    }

    let decoded_values = decode_samples(header.dtype, header.little_endian, &uncompressed)?;

    Ok(DecodeOutput {
        header,
        uncompressed_payload_bytes: uncompressed,
        decoded_values,
    })
}
