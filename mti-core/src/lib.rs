//! mti-core: codec for the Mesh Tile Format v1 (MTI1) container.
//!
//! No file I/O, no CLI, no networking — just the header layout, the typed
//! sample pipeline, tile-identity packing, and the encode/decode/inspect
//! pipelines built on top of them.

pub mod compression;
pub mod crc;
pub mod dtype;
pub mod error;
pub mod header;
pub mod nodata;
pub mod payload;
pub mod tile;
pub mod tile_id;

// Re-export commonly used types at crate root.
pub use compression::Compression;
pub use dtype::DType;
pub use error::{MtiError, Result};
pub use header::{Header, FORMAT_MAJOR, HEADER_CRC_INPUT_LEN, HEADER_LEN};
pub use tile::{
    decode_tile, encode_tile, inspect_tile, DecodeOutput, EncodeInput, EncodeOutput,
    InspectOutput, TileIdInputOwned,
};
pub use tile_id::{
    assert_valid_xyz, decode_xyz, encode_xyz, MeshKind, XyzId, MAX_ZOOM, QUADKEY_BITS, ZOOM_BITS,
};
