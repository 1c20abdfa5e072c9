//! Nikon Electronic Format (NEF).
//!
//! Layout notes: http://lclevy.free.fr/nef/
//!
//! The full-size JPEG preview lives in the first SubIFD of IFD0 and is
//! referenced through the JPEG interchange tags.

use super::preview::{interchange_location, sub_ifd_offsets, PreviewLocation};
use super::tiff::TiffReader;
use super::RawParser;
use crate::decode::DecodeError;

/// Registry key for NEF files.
pub const NEF_PARSER_KEY: &str = "NEF";

/// Parser for Nikon NEF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NefParser;

impl NefParser {
    pub fn new() -> Self {
        Self
    }
}

impl RawParser for NefParser {
    fn key(&self) -> &'static str {
        NEF_PARSER_KEY
    }

    fn locate_preview(&self, bytes: &[u8]) -> Result<PreviewLocation, DecodeError> {
        let mut reader = TiffReader::new(bytes)?;
        let ifd0 = reader.ifd0()?;

        let sub0 = sub_ifd_offsets(&ifd0, &mut reader)
            .into_iter()
            .next()
            .ok_or(DecodeError::NoThumbnail)?;
        let sub_ifd = reader.ifd_at(sub0)?;

        let location = interchange_location(&sub_ifd, &reader).ok_or(DecodeError::NoThumbnail)?;
        location.slice(bytes)?;
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::fixtures::{nef_file, Tiff, TYPE_LONG};
    use crate::raw::tiff::{ByteOrder, TAG_SUBIFD};

    const PREVIEW: &[u8] = &[0xFF, 0xD8, 0xFF, 0xC4, 0x10, 0x20, 0x30, 0xFF, 0xD9];

    #[test]
    fn test_locate_preview_inline_subifd() {
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let bytes = nef_file(order, PREVIEW, 1, None, 0);
            let loc = NefParser.locate_preview(&bytes).unwrap();
            assert_eq!(loc.slice(&bytes).unwrap(), PREVIEW);
        }
    }

    #[test]
    fn test_locate_preview_subifd_array() {
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let bytes = nef_file(order, PREVIEW, 1, None, 2);
            let loc = NefParser.locate_preview(&bytes).unwrap();
            assert_eq!(loc.slice(&bytes).unwrap(), PREVIEW);
        }
    }

    #[test]
    fn test_no_subifd_is_no_thumbnail() {
        let mut tiff = Tiff::new(ByteOrder::LittleEndian);
        tiff.ifd0(&[]);
        assert!(matches!(
            NefParser.locate_preview(&tiff.finish()),
            Err(DecodeError::NoThumbnail)
        ));
    }

    #[test]
    fn test_subifd_without_jpeg_tags() {
        let mut tiff = Tiff::new(ByteOrder::BigEndian);
        let sub = tiff.ifd(&[]);
        tiff.ifd0(&[(TAG_SUBIFD, TYPE_LONG, 1, sub)]);
        assert!(matches!(
            NefParser.locate_preview(&tiff.finish()),
            Err(DecodeError::NoThumbnail)
        ));
    }

    #[test]
    fn test_subifd_past_eof_is_corrupt() {
        let mut tiff = Tiff::new(ByteOrder::LittleEndian);
        tiff.ifd0(&[(TAG_SUBIFD, TYPE_LONG, 1, 0x00FF_FFFF)]);
        assert!(matches!(
            NefParser.locate_preview(&tiff.finish()),
            Err(DecodeError::CorruptedFile(_))
        ));
    }

    #[test]
    fn test_rejects_jpeg_input() {
        assert!(matches!(
            NefParser.locate_preview(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46]),
            Err(DecodeError::InvalidFormat)
        ));
    }
}
