//! PNG decode into linear light and 1-bit output encoding.

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use mono_dither::{Bitmap, LinearImage};

use crate::error::ImageError;

/// Read a PNG file into a [`LinearImage`].
pub fn load_png(path: &Path, correct_gamma: bool) -> Result<LinearImage, ImageError> {
    let file = File::open(path)?;
    decode_png(BufReader::new(file), correct_gamma)
}

/// Decode a PNG stream into a [`LinearImage`].
///
/// Palette and low bit depth images are expanded, 16-bit channels are
/// reduced to 8. Transparent pixels are composited over white paper.
pub fn decode_png<R: Read>(reader: R, correct_gamma: bool) -> Result<LinearImage, ImageError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => return Err(ImageError::UnsupportedColor(other)),
    };
    let (width, height) = (info.width as usize, info.height as usize);
    let mut image = LinearImage::new(width, height)?;

    for (y, row) in buf[..info.buffer_size()]
        .chunks(info.line_size)
        .take(height)
        .enumerate()
    {
        for (x, px) in row.chunks(channels).take(width).enumerate() {
            let (r, g, b, a) = match px {
                &[v] => (v, v, v, 255),
                &[v, a] => (v, v, v, a),
                &[r, g, b] => (r, g, b, 255),
                &[r, g, b, a] => (r, g, b, a),
                _ => continue,
            };
            image.set_pixel(x, y, r, g, b, correct_gamma);
            if a < 255 {
                let alpha = f64::from(a) / 255.0;
                let v = image.get_pixel(x, y);
                image.set_value(x, y, v * alpha + (1.0 - alpha), false);
            }
        }
    }

    tracing::debug!(width, height, channels, "decoded PNG");
    Ok(image)
}

/// Encode a bitmap as a 1-bit greyscale PNG.
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, ImageError> {
    // PNG greyscale: a set bit is white
    let data: Vec<u8> = bitmap.pack_rows().iter().map(|b| !b).collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, bitmap.width() as u32, bitmap.height() as u32);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::One);
        encoder.set_compression(png::Compression::Best);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
    }
    Ok(buf.into_inner())
}

/// Write a bitmap as a 1-bit PNG file.
pub fn save_png(path: &Path, bitmap: &Bitmap) -> Result<(), ImageError> {
    let bytes = encode_png(bitmap)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Write the packed printer rows: `ceil(width / 8)` bytes per row, MSB
/// first, a set bit is a black dot.
pub fn save_packed(path: &Path, bitmap: &Bitmap) -> Result<(), ImageError> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(&bitmap.pack_rows())?;
    out.flush()?;
    Ok(())
}
