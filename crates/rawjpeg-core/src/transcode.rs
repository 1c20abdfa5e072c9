//! Decode a JPEG and re-encode it at a chosen quality.
//!
//! The decoded pixel buffer is owned by the call. It is dropped on every exit
//! path: after a successful write, after an encode or write failure, and
//! never allocated at all when decoding fails.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{decode_jpeg, DecodeError};
use crate::encode::{encode_jpeg, write_jpeg_file, EncodeError};

/// Errors from a transcode call.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The input could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The decoded pixels could not be encoded or written.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// No output path was given.
    #[error("Output path is empty")]
    EmptyPath,
}

/// Encoder quality on the usual 1-100 JPEG scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Quality(u8);

impl Quality {
    /// Lowest quality the encoder accepts.
    pub const MIN: Quality = Quality(1);
    /// Highest quality the encoder accepts.
    pub const MAX: Quality = Quality(100);

    /// Take a caller-supplied quality, clamping it into 1..=100.
    pub fn from_raw(value: i32) -> Self {
        Quality(value.clamp(Self::MIN.0 as i32, Self::MAX.0 as i32) as u8)
    }

    /// The clamped value, ready for the encoder.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality(90)
    }
}

impl From<i32> for Quality {
    fn from(value: i32) -> Self {
        Quality::from_raw(value)
    }
}

impl From<Quality> for i32 {
    fn from(value: Quality) -> Self {
        value.0 as i32
    }
}

/// Decode `bytes` as JPEG and write it to `output` re-encoded at `quality`.
///
/// Exactly one file is created or replaced on success; on failure nothing is
/// written to `output`.
///
/// # Errors
///
/// - `TranscodeError::EmptyPath` - `output` is empty
/// - `TranscodeError::Decode` - corrupt, truncated or non-JPEG input
/// - `TranscodeError::Encode` - encoding failed or `output` is not writable
pub fn transcode(bytes: &[u8], quality: impl Into<Quality>, output: &Path) -> Result<(), TranscodeError> {
    if output.as_os_str().is_empty() {
        return Err(TranscodeError::EmptyPath);
    }
    let quality = quality.into();

    let image = decode_jpeg(bytes).inspect_err(|e| warn!("transcode: decode failed: {}", e))?;
    write_jpeg_file(output, &image, quality.get())
        .inspect_err(|e| warn!("transcode: encode failed: {}", e))?;

    Ok(())
}

/// Decode `bytes` as JPEG and return it re-encoded at `quality`.
pub fn transcode_to_vec(bytes: &[u8], quality: impl Into<Quality>) -> Result<Vec<u8>, TranscodeError> {
    let image = decode_jpeg(bytes)?;
    let jpeg = encode_jpeg(&image.pixels, image.width, image.height, quality.into().get())?;
    Ok(jpeg)
}
