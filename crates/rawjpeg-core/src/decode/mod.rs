//! Image decoding for rawjpeg.
//!
//! This module provides functionality for:
//! - Decoding JPEG images into RGB pixel buffers
//! - Reading EXIF orientation from parsed metadata
//!
//! All operations are synchronous and hold no state between calls.
//!
//! # Examples
//!
//! ```ignore
//! use rawjpeg_core::decode::decode_jpeg;
//!
//! let jpeg_bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_jpeg(&jpeg_bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod jpeg;
mod types;

pub(crate) use jpeg::{is_jpeg_data, orientation_from_exif};
pub use jpeg::decode_jpeg;
pub use types::{DecodeError, DecodedImage, Orientation, OUTPUT_CHANNELS};
