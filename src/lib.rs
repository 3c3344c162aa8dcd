//! Ditherbooth - monochrome dithering for photobooth prints
//!
//! PNG in, 1-bit PNG and packed printer rows out.
//! This library exposes modules for integration testing.

pub mod config;
pub mod error;
pub mod image_io;
