//! CSV projection of decoded tile values — a pure function of dimensions
//! and data, kept out of `mti-core` per spec.md §1 (the CSV format is an
//! external-collaborator concern, not part of the codec).

use mti_core::Header;

/// Project decoded values into the CLI's CSV layout:
///
/// ```text
/// x,y,b0,...,b{bands-1}
/// col,row,v0,...,v{bands-1}
/// ```
///
/// one row per cell, `col` varying fastest within `row`.
pub fn project(header: &Header, values: &[f64]) -> String {
    let rows = header.rows as u64;
    let cols = header.cols as u64;
    let bands = header.bands as u64;

    let mut out = String::new();
    out.push_str("x,y");
    for b in 0..bands {
        out.push_str(&format!(",b{b}"));
    }
    out.push('\n');

    for row in 0..rows {
        for col in 0..cols {
            out.push_str(&format!("{col},{row}"));
            for band in 0..bands {
                let idx = mti_core::payload::sample_index(row, col, band, cols, bands) as usize;
                out.push_str(&format!(",{}", values[idx]));
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mti_core::{Compression, DType, MeshKind};

    fn header(rows: u32, cols: u32, bands: u8) -> Header {
        Header {
            format_major: 1,
            tile_id: 1,
            mesh_kind: MeshKind::JisX0410,
            dtype: DType::Uint16,
            little_endian: true,
            compression: Compression::None,
            rows,
            cols,
            bands,
            no_data: None,
            uncompressed_payload_length: 0,
            compressed_payload_length: 0,
            payload_crc32: 0,
            header_crc32: 0,
        }
    }

    #[test]
    fn test_header_row() {
        let h = header(1, 1, 2);
        let csv = project(&h, &[1.0, 2.0]);
        assert!(csv.starts_with("x,y,b0,b1\n"));
    }

    #[test]
    fn test_col_varies_fastest_within_row() {
        let h = header(2, 2, 1);
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let csv = project(&h, &values);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "x,y,b0");
        assert_eq!(lines[1], "0,0,1");
        assert_eq!(lines[2], "1,0,2");
        assert_eq!(lines[3], "0,1,3");
        assert_eq!(lines[4], "1,1,4");
    }

    #[test]
    fn test_multi_band_row_layout() {
        let h = header(1, 2, 2);
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let csv = project(&h, &values);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "0,0,1,2");
        assert_eq!(lines[2], "1,0,3,4");
    }
}
