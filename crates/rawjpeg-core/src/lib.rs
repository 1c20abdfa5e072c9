//! rawjpeg core - JPEG transcoding and raw preview extraction.
//!
//! This crate decodes JPEG data into an RGB pixel buffer, re-encodes it at a
//! caller-chosen quality, and writes the result to disk. On top of that it
//! pulls the embedded JPEG preview out of camera raw files (CR2, NEF, ARW)
//! and runs it through the same transcode step.
//!
//! The C-compatible entry points live in the `rawjpeg-ffi` crate.

pub mod decode;
pub mod encode;
pub mod raw;
pub mod transcode;

#[cfg(test)]
mod test_util;

pub use decode::{decode_jpeg, DecodeError, DecodedImage, Orientation};
pub use encode::{encode_jpeg, EncodeError};
pub use raw::{RawError, RawFile, RawFileInfo, RawParser, RawParsers};
pub use transcode::{transcode, transcode_to_vec, Quality, TranscodeError};

/// Crate version, as reported through the FFI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
