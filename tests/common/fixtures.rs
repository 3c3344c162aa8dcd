//! Test fixtures: synthetic PNG inputs.

use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Encode an 8-bit PNG of the given color type.
pub fn encode_png(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }
    buf.into_inner()
}

/// Horizontal grey ramp from black to white.
pub fn gradient_grey(width: u32, height: u32) -> Vec<u8> {
    let data: Vec<u8> = (0..height)
        .flat_map(|_| (0..width).map(move |x| (x * 255 / (width - 1)) as u8))
        .collect();
    encode_png(width, height, png::ColorType::Grayscale, &data)
}

/// Uniform RGB image.
pub fn flat_rgb(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let data: Vec<u8> = (0..width * height).flat_map(|_| rgb).collect();
    encode_png(width, height, png::ColorType::Rgb, &data)
}

/// Write `bytes` to `name` inside `dir`.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
