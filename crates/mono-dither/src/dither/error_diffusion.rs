//! Kernel-driven error diffusion.

use super::{check_output, quantize, DitherOptions, ErrorBuffer, Noise};
use crate::image::LinearImage;
use crate::matrix::DiffusionKernel;

/// Error diffusion with any [`DiffusionKernel`].
///
/// Rows are scanned top to bottom. With `serpentine` set, odd rows run right
/// to left and the kernel is mirrored horizontally. Each pixel adds the error
/// it has received plus optional Gaussian jitter (`sigma`), is thresholded at
/// 0.5, and passes `error * weight / divisor` to every kernel neighbour.
/// Neighbours outside the image are dropped, never wrapped or clamped.
///
/// # Example
///
/// ```
/// use mono_dither::dither::error_diffusion_dither;
/// use mono_dither::matrix::FLOYD_STEINBERG;
/// use mono_dither::LinearImage;
///
/// let image = LinearImage::from_fn(16, 16, |_, _| 0.5).unwrap();
/// let mut out = vec![0u8; 256];
/// error_diffusion_dither(&image, &FLOYD_STEINBERG, true, 0.0, &mut out);
/// let white = out.iter().filter(|&&p| p == 255).count();
/// assert!((120..=136).contains(&white));
/// ```
pub fn error_diffusion_dither(
    image: &LinearImage,
    kernel: &DiffusionKernel,
    serpentine: bool,
    sigma: f64,
    out: &mut [u8],
) {
    let options = DitherOptions::new().serpentine(serpentine).sigma(sigma);
    diffuse(image, kernel, &options, out);
}

/// Core error diffusion loop shared by the builder and [`error_diffusion_dither`].
pub(crate) fn diffuse(
    image: &LinearImage,
    kernel: &DiffusionKernel,
    options: &DitherOptions,
    out: &mut [u8],
) {
    check_output(image, out);
    let (width, height) = (image.width(), image.height());
    let pixels = image.pixels();
    let mut noise = Noise::new(options.seed);

    // Create error buffer with depth = max_dy + 1
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy() + 1);
    let divisor = kernel.divisor();

    for y in 0..height {
        // Determine scan direction
        let reverse = options.serpentine && y % 2 == 1;

        let x_range: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..width).rev())
        } else {
            Box::new(0..width)
        };

        for x in x_range {
            let idx = y * width + x;
            let value = pixels[idx] + error_buf.get_accumulated(x) + noise.gaussian(options.sigma);
            let (byte, level) = quantize(value);
            out[idx] = byte;
            let error = value - level;
            if error == 0.0 {
                continue;
            }

            for &(dx, dy, weight) in kernel.entries() {
                let effective_dx = if reverse { -dx } else { dx };
                let nx = x as isize + effective_dx as isize;
                let ny = y + dy as usize;
                if nx < 0 || nx >= width as isize || ny >= height {
                    continue;
                }
                error_buf.add_error(nx as usize, dy as usize, error * weight as f64 / divisor);
            }
        }

        error_buf.advance_row();
    }
}
