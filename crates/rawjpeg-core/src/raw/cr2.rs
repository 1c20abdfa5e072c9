//! Canon Raw Format 2 (CR2).
//!
//! Layout notes: http://lclevy.free.fr/cr2/
//!
//! A CR2 starts with an ordinary TIFF header followed by the `CR` signature
//! and a major/minor version. IFD0 describes the full-size JPEG preview
//! through its strip tags.

use super::preview::{strip_location, PreviewLocation};
use super::tiff::TiffReader;
use super::RawParser;
use crate::decode::DecodeError;

/// Registry key for CR2 files.
pub const CR2_PARSER_KEY: &str = "CR2";

const CR2_MAGIC: [u8; 2] = *b"CR";

/// Version pair stored at bytes 10 and 11 of a CR2 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cr2Version {
    pub major: u8,
    pub minor: u8,
}

/// Parser for Canon CR2 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cr2Parser;

impl Cr2Parser {
    pub fn new() -> Self {
        Self
    }

    /// Validate the CR2 signature and return the format version.
    pub fn version(bytes: &[u8]) -> Result<Cr2Version, DecodeError> {
        if bytes.len() < 12 {
            return Err(DecodeError::CorruptedFile("Truncated CR2 header".to_string()));
        }
        if bytes[8..10] != CR2_MAGIC {
            return Err(DecodeError::InvalidFormat);
        }
        Ok(Cr2Version {
            major: bytes[10],
            minor: bytes[11],
        })
    }
}

impl RawParser for Cr2Parser {
    fn key(&self) -> &'static str {
        CR2_PARSER_KEY
    }

    fn locate_preview(&self, bytes: &[u8]) -> Result<PreviewLocation, DecodeError> {
        let mut reader = TiffReader::new(bytes)?;
        Self::version(bytes)?;

        let ifd0 = reader.ifd0()?;
        let location = strip_location(&ifd0, &reader).ok_or(DecodeError::NoThumbnail)?;
        location.slice(bytes)?;
        Ok(location)
    }
}
