//! Image encoding for rawjpeg.
//!
//! This module provides functionality for:
//! - Encoding RGB buffers to JPEG bytes with configurable quality
//! - Writing an encoded image to a file
//!
//! # Examples
//!
//! ```ignore
//! use rawjpeg_core::encode::encode_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 90).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;

pub use jpeg::{encode_jpeg, write_jpeg_file, EncodeError};
