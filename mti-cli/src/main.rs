//! mti: inspect, decode, and encode Mesh Tile Format v1 (MTI1) tiles.

use std::io::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use mti_core::{
    compression::Compression, decode_tile, dtype::DType, encode_tile, inspect_tile, tile::{EncodeInput, TileIdInputOwned}, MeshKind,
};

mod csv;

#[derive(Parser)]
#[command(name = "mti", version, about = "Mesh Tile Format v1 (MTI1) codec CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed header, one `Label: value` line per field
    Inspect {
        /// Path to an MTI1 file
        file: PathBuf,
    },

    /// Decode an MTI1 file and print its values as CSV
    Decode {
        /// Path to an MTI1 file
        file: PathBuf,

        /// Write CSV to this path instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Build and write a new MTI1 file
    Encode {
        /// Output file path
        #[arg(long)]
        output: PathBuf,

        /// JSON object supplying any subset of the scalar fields below
        #[arg(long)]
        metadata: Option<String>,

        /// JSON array of sample values, length rows*cols*bands
        #[arg(long)]
        values: Option<String>,

        /// Path to a file containing a JSON array of sample values
        #[arg(long, conflicts_with = "values")]
        values_file: Option<PathBuf>,

        #[arg(long)]
        tile_id: Option<String>,

        #[arg(long, value_enum)]
        mesh_kind: Option<MeshKindArg>,

        #[arg(long)]
        rows: Option<u32>,

        #[arg(long)]
        cols: Option<u32>,

        #[arg(long)]
        bands: Option<u8>,

        #[arg(long, value_enum)]
        dtype: Option<DTypeArg>,

        #[arg(long, value_enum)]
        endianness: Option<EndiannessArg>,

        #[arg(long, value_enum)]
        compression: Option<CompressionArg>,

        /// A finite number, or `null` for absent
        #[arg(long)]
        no_data: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MeshKindArg {
    JisX0410,
    Xyz,
}

impl From<MeshKindArg> for MeshKind {
    fn from(v: MeshKindArg) -> Self {
        match v {
            MeshKindArg::JisX0410 => MeshKind::JisX0410,
            MeshKindArg::Xyz => MeshKind::Xyz,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DTypeArg {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Float32,
    Float64,
}

impl From<DTypeArg> for DType {
    fn from(v: DTypeArg) -> Self {
        match v {
            DTypeArg::Uint8 => DType::Uint8,
            DTypeArg::Int8 => DType::Int8,
            DTypeArg::Uint16 => DType::Uint16,
            DTypeArg::Int16 => DType::Int16,
            DTypeArg::Uint32 => DType::Uint32,
            DTypeArg::Int32 => DType::Int32,
            DTypeArg::Float32 => DType::Float32,
            DTypeArg::Float64 => DType::Float64,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EndiannessArg {
    Little,
    Big,
}

#[derive(Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    DeflateRaw,
}

impl From<CompressionArg> for Compression {
    fn from(v: CompressionArg) -> Self {
        match v {
            CompressionArg::None => Compression::None,
            CompressionArg::DeflateRaw => Compression::DeflateRaw,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { file } => cmd_inspect(&file),
        Commands::Decode { file, output } => cmd_decode(&file, output.as_deref()),
        Commands::Encode {
            output,
            metadata,
            values,
            values_file,
            tile_id,
            mesh_kind,
            rows,
            cols,
            bands,
            dtype,
            endianness,
            compression,
            no_data,
        } => cmd_encode(EncodeArgs {
            output,
            metadata,
            values,
            values_file,
            tile_id,
            mesh_kind,
            rows,
            cols,
            bands,
            dtype,
            endianness,
            compression,
            no_data,
        }),
    };

    if let Err(message) = result {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn cmd_inspect(file: &std::path::Path) -> Result<(), String> {
    let bytes = std::fs::read(file).map_err(|e| format!("error: IO_ERROR: {e}"))?;
    let inspected = inspect_tile(&bytes).map_err(|e| format!("error: {}: {e}", e.code()))?;
    let h = &inspected.header;

    println!("magic: MTI1");
    println!("format_major: {}", h.format_major);
    println!("tile_id: {}", h.tile_id);
    println!("mesh_kind: {:?}", h.mesh_kind);
    println!("dtype: {:?}", h.dtype);
    println!(
        "endianness: {}",
        if h.little_endian { "little" } else { "big" }
    );
    println!("compression: {:?}", h.compression);
    println!("rows: {}", h.rows);
    println!("cols: {}", h.cols);
    println!("bands: {}", h.bands);
    match h.no_data {
        Some(v) => println!("no_data: {v}"),
        None => println!("no_data: null"),
    }
    println!(
        "uncompressed_payload_length: {}",
        h.uncompressed_payload_length
    );
    println!(
        "compressed_payload_length: {}",
        h.compressed_payload_length
    );
    println!("payload_crc32: {:08x}", h.payload_crc32);
    println!("header_crc32: {:08x}", h.header_crc32);
    println!("header_length: {}", inspected.header_length);
    println!("payload_offset: {}", inspected.payload_offset);
    println!("payload_length: {}", inspected.payload_length);

    Ok(())
}

fn cmd_decode(file: &std::path::Path, output: Option<&std::path::Path>) -> Result<(), String> {
    let bytes = std::fs::read(file).map_err(|e| format!("error: IO_ERROR: {e}"))?;
    let decoded = decode_tile(&bytes).map_err(|e| format!("error: {}: {e}", e.code()))?;
    let csv_text = csv::project(&decoded.header, &decoded.decoded_values);

    match output {
        Some(path) => {
            std::fs::write(path, csv_text).map_err(|e| format!("error: IO_ERROR: {e}"))?;
        }
        None => {
            std::io::stdout()
                .write_all(csv_text.as_bytes())
                .map_err(|e| format!("error: IO_ERROR: {e}"))?;
        }
    }
    Ok(())
}

struct EncodeArgs {
    output: PathBuf,
    metadata: Option<String>,
    values: Option<String>,
    values_file: Option<PathBuf>,
    tile_id: Option<String>,
    mesh_kind: Option<MeshKindArg>,
    rows: Option<u32>,
    cols: Option<u32>,
    bands: Option<u8>,
    dtype: Option<DTypeArg>,
    endianness: Option<EndiannessArg>,
    compression: Option<CompressionArg>,
    no_data: Option<String>,
}

fn cmd_encode(args: EncodeArgs) -> Result<(), String> {
    let metadata: serde_json::Value = match &args.metadata {
        Some(text) => serde_json::from_str(text)
            .map_err(|e| format!("error: INVALID_FIELD_VALUE: --metadata is not valid JSON: {e}"))?,
        None => serde_json::Value::Null,
    };

    let meta_str = |key: &str| -> Option<String> {
        metadata.get(key).and_then(|v| v.as_str()).map(str::to_owned)
    };
    let meta_u64 = |key: &str| -> Option<u64> { metadata.get(key).and_then(|v| v.as_u64()) };
    let meta_bounded_u64 = |key: &str, max: u64| -> Result<Option<u64>, String> {
        match meta_u64(key) {
            None => Ok(None),
            Some(v) if v <= max => Ok(Some(v)),
            Some(v) => Err(format!(
                "error: INVALID_FIELD_VALUE: --metadata {key}={v} exceeds the allowed maximum {max}"
            )),
        }
    };
    let meta_enum = |key: &str| -> Result<Option<String>, String> {
        match metadata.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(str::to_owned)
                .map(Some)
                .ok_or_else(|| format!("error: INVALID_FIELD_VALUE: --metadata {key} must be a string")),
        }
    };

    let tile_id = args
        .tile_id
        .or_else(|| meta_str("tile_id"))
        .ok_or_else(|| "error: MISSING_REQUIRED_FIELD: tile_id".to_string())?;

    let mesh_kind: MeshKind = match args.mesh_kind.map(MeshKind::from) {
        Some(v) => v,
        None => match meta_enum("mesh_kind")? {
            Some(text) => MeshKind::from(
                MeshKindArg::from_str(&text, true)
                    .map_err(|e| format!("error: INVALID_FIELD_VALUE: mesh_kind: {e}"))?,
            ),
            None => return Err("error: MISSING_REQUIRED_FIELD: mesh_kind".to_string()),
        },
    };

    let rows = match args.rows {
        Some(v) => v,
        None => meta_bounded_u64("rows", u32::MAX as u64)?
            .map(|v| v as u32)
            .ok_or_else(|| "error: MISSING_REQUIRED_FIELD: rows".to_string())?,
    };
    let cols = match args.cols {
        Some(v) => v,
        None => meta_bounded_u64("cols", u32::MAX as u64)?
            .map(|v| v as u32)
            .ok_or_else(|| "error: MISSING_REQUIRED_FIELD: cols".to_string())?,
    };
    let bands = match args.bands {
        Some(v) => v,
        None => meta_bounded_u64("bands", u8::MAX as u64)?
            .map(|v| v as u8)
            .ok_or_else(|| "error: MISSING_REQUIRED_FIELD: bands".to_string())?,
    };

    let dtype: DType = match args.dtype.map(DType::from) {
        Some(v) => v,
        None => match meta_enum("dtype")? {
            Some(text) => DType::from(
                DTypeArg::from_str(&text, true)
                    .map_err(|e| format!("error: INVALID_FIELD_VALUE: dtype: {e}"))?,
            ),
            None => return Err("error: MISSING_REQUIRED_FIELD: dtype".to_string()),
        },
    };

    let endianness = match args.endianness {
        Some(v) => Some(v),
        None => match meta_enum("endianness")? {
            Some(text) => Some(
                EndiannessArg::from_str(&text, true)
                    .map_err(|e| format!("error: INVALID_FIELD_VALUE: endianness: {e}"))?,
            ),
            None => None,
        },
    };
    let little_endian = match endianness {
        Some(EndiannessArg::Little) | None => true,
        Some(EndiannessArg::Big) => false,
    };

    let compression = match args.compression {
        Some(v) => Some(Compression::from(v)),
        None => match meta_enum("compression")? {
            Some(text) => Some(Compression::from(
                CompressionArg::from_str(&text, true)
                    .map_err(|e| format!("error: INVALID_FIELD_VALUE: compression: {e}"))?,
            )),
            None => None,
        },
    };

    let no_data = match args.no_data.as_deref() {
        Some("null") => None,
        Some(text) => Some(
            text.parse::<f64>()
                .map_err(|_| format!("error: INVALID_FIELD_VALUE: --no-data {text} is not a number"))?,
        ),
        None => match metadata.get("no_data") {
            None | Some(serde_json::Value::Null) => None,
            Some(v) => Some(v.as_f64().ok_or_else(|| {
                "error: INVALID_FIELD_VALUE: --metadata no_data must be a number or null".to_string()
            })?),
        },
    };

    let values_text = match (&args.values, &args.values_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => {
            std::fs::read_to_string(path).map_err(|e| format!("error: IO_ERROR: {e}"))?
        }
        (None, None) => return Err("error: MISSING_REQUIRED_FIELD: values".to_string()),
    };
    let values: Vec<f64> = serde_json::from_str(&values_text)
        .map_err(|e| format!("error: INVALID_FIELD_VALUE: --values is not a JSON number array: {e}"))?;

    let input = EncodeInput {
        tile_id: TileIdInputOwned::Str(tile_id),
        mesh_kind,
        dtype,
        little_endian,
        compression,
        rows,
        cols,
        bands,
        no_data,
        values: &values,
    };

    let output = encode_tile(input).map_err(|e| format!("error: {}: {e}", e.code()))?;
    std::fs::write(&args.output, &output.bytes).map_err(|e| format!("error: IO_ERROR: {e}"))?;
    Ok(())
}
