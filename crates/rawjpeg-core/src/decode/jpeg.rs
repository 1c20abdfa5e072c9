//! JPEG decoding to interleaved RGB.

use std::io::Cursor;

use exif::{Exif, In, Tag};
use image::{ImageFormat, ImageReader};
use log::debug;

use super::{DecodeError, DecodedImage};
use crate::decode::types::Orientation;

/// JPEG start-of-image marker.
pub(crate) const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// Check if a byte slice starts with the JPEG SOI marker.
#[inline]
pub(crate) fn is_jpeg_data(data: &[u8]) -> bool {
    data.len() >= 2 && data[..2] == JPEG_SOI
}

/// Decode a JPEG image from bytes into an RGB pixel buffer.
///
/// The output always has three channels per pixel: grey sources are
/// expanded and CMYK sources converted, so callers never branch on the
/// source layout. The channel count the decoder reports for the source (1 or
/// 3) is kept in [`DecodedImage::source_channels`]. Dimensions are the stored ones; EXIF
/// orientation is not applied.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes do not start with a JPEG SOI marker.
/// Returns `DecodeError::CorruptedFile` if the JPEG stream is corrupted or truncated.
pub fn decode_jpeg(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if !is_jpeg_data(bytes) {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::with_format(Cursor::new(bytes), ImageFormat::Jpeg);
    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let source_channels = img.color().channel_count();
    let rgb_img = img.into_rgb8();
    debug!(
        "decoded {}x{} jpeg ({} source channels, {} bytes in)",
        rgb_img.width(),
        rgb_img.height(),
        source_channels,
        bytes.len()
    );

    Ok(DecodedImage::from_rgb_image(rgb_img, source_channels))
}

/// EXIF orientation of the primary image.
///
/// Falls back to `Orientation::Normal` when the tag is absent or unreadable.
pub(crate) fn orientation_from_exif(exif: &Exif) -> Orientation {
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}
