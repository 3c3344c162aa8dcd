//! Assertion helpers for tests.

use std::path::Path;

use pretty_assertions::assert_eq;

/// Decoded 1-bit PNG: width, height and one bool per pixel (true = white).
pub struct OneBitPng {
    pub width: usize,
    pub height: usize,
    pub white: Vec<bool>,
}

/// Assert `path` is a 1-bit greyscale PNG and unpack it.
pub fn assert_one_bit_png(path: &Path) -> OneBitPng {
    let file = std::fs::File::open(path).unwrap();
    let mut decoder = png::Decoder::new(std::io::BufReader::new(file));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();

    assert_eq!(info.color_type, png::ColorType::Grayscale, "Expected greyscale PNG");
    assert_eq!(info.bit_depth, png::BitDepth::One, "Expected 1-bit PNG");

    let (width, height) = (info.width as usize, info.height as usize);
    let mut white = Vec::with_capacity(width * height);
    for row in buf.chunks(info.line_size).take(height) {
        for x in 0..width {
            white.push(row[x / 8] & (0x80 >> (x % 8)) != 0);
        }
    }
    OneBitPng {
        width,
        height,
        white,
    }
}

/// Assert a packed printer buffer has the expected row layout.
pub fn assert_packed_layout(bytes: &[u8], width: usize, height: usize) {
    let stride = width.div_ceil(8);
    assert_eq!(
        bytes.len(),
        stride * height,
        "Expected {height} rows of {stride} bytes"
    );
}
