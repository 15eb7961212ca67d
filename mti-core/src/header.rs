//! Fixed 58-byte MTI1 header: pack, parse, and CRC integrity.

use crate::compression::Compression;
use crate::crc::crc32;
use crate::dtype::DType;
use crate::error::{MtiError, Result};
use crate::nodata::{decode_no_data, encode_no_data};
use crate::tile_id::{validate_tile_id_for_mesh_kind, MeshKind};
use serde::Serialize;

pub const MAGIC: [u8; 4] = *b"MTI1";
pub const FORMAT_MAJOR: u8 = 1;
pub const HEADER_LEN: usize = 58;
pub const HEADER_CRC_INPUT_LEN: usize = 54;

/// The fully parsed contents of the 58-byte fixed header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub format_major: u8,
    pub tile_id: u64,
    pub mesh_kind: MeshKind,
    pub dtype: DType,
    pub little_endian: bool,
    pub compression: Compression,
    pub rows: u32,
    pub cols: u32,
    pub bands: u8,
    pub no_data: Option<f64>,
    pub uncompressed_payload_length: u64,
    pub compressed_payload_length: u64,
    pub payload_crc32: u32,
    pub header_crc32: u32,
}

impl Header {
    /// `rows * cols * bands` as a `u64` sample count.
    ///
    /// Fails with `INVALID_FIELD_VALUE` rather than overflowing — spec.md
    /// invariant 1 requires `sample_count` to fit a pointer-safe integer,
    /// and `rows`/`cols`/`bands` alone don't guarantee the product fits a
    /// `u64`.
    pub fn sample_count(&self) -> Result<u64> {
        (self.rows as u64)
            .checked_mul(self.cols as u64)
            .and_then(|rc| rc.checked_mul(self.bands as u64))
            .ok_or_else(|| {
                MtiError::invalid_field(format!(
                    "rows({}) * cols({}) * bands({}) overflows a u64 sample count",
                    self.rows, self.cols, self.bands
                ))
            })
    }

    /// Pack this header into its 58-byte on-disk form, computing and
    /// embedding the header CRC.
    pub fn pack(&self) -> Result<[u8; HEADER_LEN]> {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4] = self.format_major;
        buf[5..13].copy_from_slice(&self.tile_id.to_le_bytes());
        buf[13] = self.mesh_kind.code();

        let endian_bit = if self.little_endian { 0 } else { 0x80 };
        buf[14] = self.dtype.code() | endian_bit;
        buf[15] = self.compression.code();

        buf[16..20].copy_from_slice(&self.rows.to_le_bytes());
        buf[20..24].copy_from_slice(&self.cols.to_le_bytes());
        buf[24] = self.bands;

        let no_data_slot = encode_no_data(self.dtype, self.little_endian, self.no_data)?;
        buf[25] = no_data_slot[0];
        buf[26..34].copy_from_slice(&no_data_slot[1..9]);

        buf[34..42].copy_from_slice(&self.uncompressed_payload_length.to_le_bytes());
        buf[42..50].copy_from_slice(&self.compressed_payload_length.to_le_bytes());
        buf[50..54].copy_from_slice(&self.payload_crc32.to_le_bytes());

        let crc = crc32(&buf[0..HEADER_CRC_INPUT_LEN]);
        buf[54..58].copy_from_slice(&crc.to_le_bytes());
        Ok(buf)
    }

    /// Parse and validate a 58-byte header, applying the fixed rejection
    /// order from spec.md §4.7: magic, version, header CRC, enum/dimension
    /// values, tile-id validity for mesh kind, no_data padding.
    pub fn parse(bytes: &[u8]) -> Result<Header> {
        if bytes.len() < HEADER_LEN {
            return Err(MtiError::InvalidHeaderLength(format!(
                "need at least {HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let buf = &bytes[0..HEADER_LEN];

        if buf[0..4] != MAGIC {
            return Err(MtiError::InvalidMagic(format!(
                "expected {:?}, got {:?}",
                MAGIC,
                &buf[0..4]
            )));
        }

        let format_major = buf[4];
        if format_major != FORMAT_MAJOR {
            return Err(MtiError::UnsupportedVersion(format!(
                "expected format_major {FORMAT_MAJOR}, got {format_major}"
            )));
        }

        let mut crc_check = [0u8; HEADER_LEN];
        crc_check.copy_from_slice(buf);
        crc_check[54..58].copy_from_slice(&[0, 0, 0, 0]);
        let computed = crc32(&crc_check[0..HEADER_CRC_INPUT_LEN]);
        let stored = u32::from_le_bytes([buf[54], buf[55], buf[56], buf[57]]);
        if computed != stored {
            return Err(MtiError::HeaderChecksumMismatch(format!(
                "computed {computed:08x}, stored {stored:08x}"
            )));
        }

        let tile_id = u64::from_le_bytes(buf[5..13].try_into().unwrap());
        let mesh_kind = MeshKind::from_code(buf[13])?;

        let dtype_endian = buf[14];
        let little_endian = dtype_endian & 0x80 == 0;
        let dtype = DType::from_code(dtype_endian & 0x7F)?;

        let compression = Compression::from_code(buf[15])?;

        let rows = u32::from_le_bytes(buf[16..20].try_into().unwrap());
        let cols = u32::from_le_bytes(buf[20..24].try_into().unwrap());
        let bands = buf[24];

        if rows == 0 || cols == 0 || bands == 0 {
            return Err(MtiError::invalid_field(
                "rows, cols, and bands must all be nonzero".to_string(),
            ));
        }

        validate_tile_id_for_mesh_kind(mesh_kind, tile_id)?;

        let mut no_data_slot = [0u8; 9];
        no_data_slot[0] = buf[25];
        no_data_slot[1..9].copy_from_slice(&buf[26..34]);
        let no_data = decode_no_data(dtype, little_endian, &no_data_slot)?;

        let uncompressed_payload_length = u64::from_le_bytes(buf[34..42].try_into().unwrap());
        let compressed_payload_length = u64::from_le_bytes(buf[42..50].try_into().unwrap());
        let payload_crc32 = u32::from_le_bytes(buf[50..54].try_into().unwrap());

        Ok(Header {
            format_major,
            tile_id,
            mesh_kind,
            dtype,
            little_endian,
            compression,
            rows,
            cols,
            bands,
            no_data,
            uncompressed_payload_length,
            compressed_payload_length,
            payload_crc32,
            header_crc32: stored,
        })
    }
}
