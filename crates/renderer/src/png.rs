//! Indexed PNG encoding (color type 3) with palette transparency.
//!
//! Heatmap cells are quantized to 256 levels before encoding, so the
//! palette path always applies: 1 byte per pixel, alpha carried in the
//! tRNS chunk, no RGBA fallback needed.

use std::io::Write;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Index buffer length {actual} does not match {width}x{height} image")]
    BufferMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("Palette has {0} entries, indexed PNG allows at most 256")]
    PaletteTooLarge(usize),

    #[error("IDAT compression failed: {0}")]
    Compression(#[from] std::io::Error),
}

/// Encode an indexed PNG from palette indices.
///
/// # Arguments
/// - `width`, `height`: image dimensions in pixels
/// - `palette`: RGBA palette entries, at most 256
/// - `indices`: one palette index per pixel, row-major, top scanline first
pub fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
) -> Result<Vec<u8>, RenderError> {
    if indices.len() != width * height {
        return Err(RenderError::BufferMismatch {
            width,
            height,
            actual: indices.len(),
        });
    }
    if palette.len() > 256 {
        return Err(RenderError::PaletteTooLarge(palette.len()));
    }

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&[137, 80, 78, 71, 13, 10, 26, 10]);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth (8 bits per palette index)
    ihdr_data.push(3); // color type 3 = indexed
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // PLTE chunk
    let mut plte_data = Vec::with_capacity(palette.len() * 3);
    for (r, g, b, _) in palette {
        plte_data.push(*r);
        plte_data.push(*g);
        plte_data.push(*b);
    }
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS chunk: alpha per palette entry, only when some entry is not
    // fully opaque.
    if palette.iter().any(|(_, _, _, a)| *a < 255) {
        let trns_data: Vec<u8> = palette.iter().map(|(_, _, _, a)| *a).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    // IDAT chunk
    let idat_data = deflate_scanlines(indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk: length, type, data, CRC over type+data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix each scanline with a filter byte (0 = none) and zlib-compress.
fn deflate_scanlines(indices: &[u8], width: usize, height: usize) -> Result<Vec<u8>, std::io::Error> {
    let mut uncompressed = Vec::with_capacity(height * (1 + width));
    for row in indices.chunks_exact(width.max(1)).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_palette() -> Vec<(u8, u8, u8, u8)> {
        vec![(0, 0, 0, 0), (255, 0, 0, 128), (0, 255, 0, 255)]
    }

    #[test]
    fn test_signature_and_chunk_layout() {
        let png = encode_indexed(2, 2, &tiny_palette(), &[0, 1, 2, 1]).unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

        // First chunk is a 13-byte IHDR.
        assert_eq!(&png[8..12], &13u32.to_be_bytes());
        assert_eq!(&png[12..16], b"IHDR");
        // Width and height.
        assert_eq!(&png[16..20], &2u32.to_be_bytes());
        assert_eq!(&png[20..24], &2u32.to_be_bytes());
        // Indexed color type.
        assert_eq!(png[25], 3);

        // File ends with an empty IEND chunk (4 length + 4 type + 4 crc).
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_trns_present_for_transparent_palette() {
        let png = encode_indexed(1, 1, &tiny_palette(), &[0]).unwrap();
        assert!(png.windows(4).any(|w| w == b"tRNS"));
    }

    #[test]
    fn test_trns_omitted_for_opaque_palette() {
        let palette = vec![(10, 20, 30, 255), (40, 50, 60, 255)];
        let png = encode_indexed(1, 2, &palette, &[0, 1]).unwrap();
        assert!(!png.windows(4).any(|w| w == b"tRNS"));
    }

    #[test]
    fn test_rejects_mismatched_buffer() {
        let result = encode_indexed(2, 2, &tiny_palette(), &[0, 1, 2]);
        assert!(matches!(result, Err(RenderError::BufferMismatch { .. })));
    }

    #[test]
    fn test_rejects_oversized_palette() {
        let palette = vec![(0, 0, 0, 255); 257];
        let result = encode_indexed(1, 1, &palette, &[0]);
        assert!(matches!(result, Err(RenderError::PaletteTooLarge(257))));
    }

    #[test]
    fn test_chunk_crc_matches() {
        let png = encode_indexed(1, 1, &tiny_palette(), &[2]).unwrap();
        // IHDR data spans bytes 12..29 (type + 13 data bytes); its CRC
        // sits right after.
        let crc = crc32fast::hash(&png[12..29]);
        assert_eq!(&png[29..33], &crc.to_be_bytes());
    }
}
