//! JPEG encoding to memory and to disk.
//!
//! Encoding goes through the `image` crate's baseline JPEG encoder. Files are
//! only touched once the whole stream has been produced in memory, and the
//! output is swapped in by rename, so a failure never changes what is on
//! disk at the output path.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use log::{debug, warn};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),

    /// The encoded stream could not be written out
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality); clamped
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a decoded image and write it to `path`, replacing any existing file.
///
/// The stream is written to a staging file next to `path` and renamed over
/// it only once fully written, so a failure leaves whatever was at `path`
/// untouched. Existing device nodes and other special files are written in
/// place instead.
pub fn write_jpeg_file(path: &Path, image: &DecodedImage, quality: u8) -> Result<(), EncodeError> {
    let jpeg = encode_jpeg(&image.pixels, image.width, image.height, quality)?;
    let write_error = |source: io::Error| EncodeError::Write {
        path: path.to_path_buf(),
        source,
    };

    let special = fs::metadata(path).is_ok_and(|m| !m.is_file() && !m.is_dir());
    if special {
        File::create(path)
            .and_then(|mut file| file.write_all(&jpeg))
            .map_err(write_error)?;
    } else {
        replace_file(path, &jpeg).map_err(write_error)?;
    }

    debug!(
        "wrote {} ({} bytes, quality {})",
        path.display(),
        jpeg.len(),
        quality.clamp(1, 100)
    );
    Ok(())
}

/// Sibling of `path` used to stage a replacement.
fn staging_path(path: &Path) -> io::Result<PathBuf> {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name")
    })?;
    let mut staged = OsString::from(".");
    staged.push(name);
    staged.push(format!(
        ".{}-{}.tmp",
        process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    Ok(path.with_file_name(staged))
}

fn replace_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let staged = staging_path(path)?;
    // create_new so cleanup only ever removes a file this call made.
    let file = OpenOptions::new().write(true).create_new(true).open(&staged)?;

    let result = write_all_to(file, bytes).and_then(|()| fs::rename(&staged, path));

    if result.is_err() {
        if let Err(e) = fs::remove_file(&staged) {
            warn!("could not remove staging file {}: {}", staged.display(), e);
        }
    }
    result
}

fn write_all_to(mut file: File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes)?;
    file.flush()
}


// ============================================================================
// Property-Based Tests
// ============================================================================
