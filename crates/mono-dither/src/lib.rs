// Generated tables and matrix arithmetic trip these lints throughout.
#![allow(
    clippy::excessive_precision,
    clippy::needless_range_loop,
    clippy::module_inception,
    clippy::doc_overindented_list_items,
    clippy::manual_range_contains
)]

//! mono-dither: Monochrome dithering for 1-bit printers and displays
//!
//! This library converts a greyscale image in linear light into a strict
//! black/white bitmap. Every classic family of halftoning is covered:
//! global thresholding, ordered screens, kernel and variable-coefficient
//! error diffusion, dot diffusion, direct binary search, Kacker–Allebach
//! screens, Riemersma curve dithering, tile patterns and grid dithering.
//!
//! # Quick Start
//!
//! The [`Ditherer`] builder is the primary entry point:
//!
//! ```
//! use mono_dither::matrix::DIFFUSION_KERNELS;
//! use mono_dither::{Algorithm, Ditherer, LinearImage, BLACK, WHITE};
//!
//! let mut image = LinearImage::new(4, 4).unwrap();
//! for y in 0..4 {
//!     for x in 0..4 {
//!         let v = ((x + y) * 32) as u8;
//!         image.set_pixel(x, y, v, v, v, true);
//!     }
//! }
//!
//! let kernel = DIFFUSION_KERNELS.require("floyd_steinberg").unwrap();
//! let bitmap = Ditherer::new(Algorithm::ErrorDiffusion(kernel))
//!     .dither(&image)
//!     .unwrap();
//! assert!(bitmap.pixels().iter().all(|&p| p == BLACK || p == WHITE));
//! ```
//!
//! # Engines
//!
//! Each engine is also available as a free function writing into a
//! caller-provided `width * height` byte buffer, see [`dither`]:
//!
//! ```
//! use mono_dither::dither::ordered_dither;
//! use mono_dither::matrix::ORDERED_MATRICES;
//! use mono_dither::LinearImage;
//!
//! let image = LinearImage::from_fn(8, 8, |_, _| 0.5).unwrap();
//! let bayer = ORDERED_MATRICES.require("bayer8x8").unwrap();
//! let mut out = vec![0u8; image.len()];
//! ordered_dither(&image, &bayer, 0.0, &mut out);
//! assert_eq!(out.iter().filter(|&&p| p == 255).count(), 32);
//! ```
//!
//! # Parameter tables
//!
//! Named kernels, screens, class matrices, curves and tile patterns live in
//! registries under [`matrix`]. Each registry builds a fresh value on
//! request, so callers own what they get:
//!
//! | Registry | Contents |
//! |----------|----------|
//! | [`DIFFUSION_KERNELS`](matrix::DIFFUSION_KERNELS) | 19 error-diffusion kernels |
//! | [`ORDERED_MATRICES`](matrix::ORDERED_MATRICES) | Bayer, magic squares, Ulichney screens and blue noise |
//! | [`DOT_CLASS_MATRICES`](matrix::DOT_CLASS_MATRICES) | Knuth, mini Knuth and spiral class orders |
//! | [`DOT_DIFFUSION_MATRICES`](matrix::DOT_DIFFUSION_MATRICES) | neighbour weights for dot diffusion |
//! | [`CURVES`](matrix::CURVES) | Hilbert, Peano, Gosper and Fass L-systems |
//! | [`TILE_PATTERNS`](matrix::TILE_PATTERNS) | fixed halftone stamps |
//! | [`LIPPENS_COEFFICIENTS`](matrix::LIPPENS_COEFFICIENTS) | Lippens dot-diffusion weights |
//!
//! # Colour handling
//!
//! Pixels are stored in linear light. [`LinearImage::set_pixel`] decodes
//! 8-bit sRGB through a lookup table when asked to; [`gamma_decode`] and
//! [`gamma_encode`] are the exact transfer functions.
//!
//! # Output
//!
//! Engines emit `0` ([`BLACK`]) or `255` ([`WHITE`]) per pixel. A [`Bitmap`]
//! also packs rows MSB-first for printer drivers, with a set bit meaning a
//! black dot.

pub mod api;
pub mod color;
pub mod dither;
pub mod image;
pub mod matrix;
pub mod output;


pub use api::{Algorithm, DitherError, Ditherer};
pub use color::{gamma_decode, gamma_encode};
pub use dither::{DitherOptions, VariableKind};
pub use image::LinearImage;
pub use matrix::{DiffusionKernel, OrderedMatrix};
pub use output::{Bitmap, BLACK, WHITE};
