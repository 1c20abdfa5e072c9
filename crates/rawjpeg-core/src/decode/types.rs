//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of interleaved channels in every decoded pixel buffer.
pub const OUTPUT_CHANNELS: u8 = 3;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// No embedded preview found in a raw file.
    #[error("No embedded thumbnail found")]
    NoThumbnail,
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }

    /// Clockwise rotation a viewer must apply to display the image upright.
    ///
    /// Mirrored variants report the rotation component only.
    pub fn rotation_degrees(self) -> u16 {
        match self {
            Orientation::Normal | Orientation::FlipHorizontal | Orientation::FlipVertical => 0,
            Orientation::Rotate90CW | Orientation::Transverse => 90,
            Orientation::Rotate180 => 180,
            Orientation::Rotate270CW | Orientation::Transpose => 270,
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded image with RGB pixel data.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Channel count the decoder reported for the source: 1 for grey, 3 for
    /// colour. CMYK sources are converted while decoding and report 3.
    /// The pixel buffer is always RGB regardless of this value.
    pub source_channels: u8,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage from an RGB buffer of a colour source.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * OUTPUT_CHANNELS as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            source_channels: OUTPUT_CHANNELS,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage, source_channels: u8) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            source_channels,
            pixels,
        }
    }

    /// Channels per pixel in `pixels`. Always 3.
    pub fn channels(&self) -> u8 {
        OUTPUT_CHANNELS
    }
}
