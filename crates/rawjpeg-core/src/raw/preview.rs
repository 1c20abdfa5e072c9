//! Locating embedded JPEG previews inside TIFF-based raw files.
//!
//! Raw files embed one or more camera-rendered JPEGs for quick display.
//! Depending on the vendor the full-size preview is referenced from IFD0
//! strips (CR2), from a SubIFD through the JPEG interchange tags (NEF), or
//! from a SubIFD/IFD1 with a smaller thumbnail elsewhere (ARW).

use serde::{Deserialize, Serialize};

use super::tiff::{
    Ifd, TiffReader, TAG_COMPRESSION, TAG_JPEG_LENGTH, TAG_JPEG_OFFSET, TAG_STRIP_BYTE_COUNTS,
    TAG_STRIP_OFFSETS, TAG_SUBIFD,
};
use crate::decode::{is_jpeg_data, DecodeError};

// JPEG compression type
const COMPRESSION_JPEG: u32 = 6;
const COMPRESSION_JPEG_OLD: u32 = 7;

const JPEG_END: [u8; 2] = [0xFF, 0xD9];

/// Previews at least this large are taken as full-size rather than thumbnails.
const MIN_SUBIFD_PREVIEW: u32 = 10_000;

/// Byte range of an embedded JPEG within its raw file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewLocation {
    pub offset: u32,
    pub length: u32,
}

impl PreviewLocation {
    /// Borrow the preview bytes, checking bounds and the JPEG SOI marker.
    ///
    /// # Errors
    ///
    /// `DecodeError::NoThumbnail` for a zero length, a range outside the file,
    /// or data that does not start like a JPEG.
    pub fn slice<'a>(&self, file_bytes: &'a [u8]) -> Result<&'a [u8], DecodeError> {
        let start = self.offset as usize;
        let end = start
            .checked_add(self.length as usize)
            .ok_or(DecodeError::NoThumbnail)?;
        if self.length == 0 || end > file_bytes.len() {
            return Err(DecodeError::NoThumbnail);
        }
        let data = &file_bytes[start..end];
        if !is_jpeg_data(data) {
            return Err(DecodeError::NoThumbnail);
        }
        Ok(data)
    }

    fn is_valid_in(&self, file_bytes: &[u8]) -> bool {
        self.slice(file_bytes).is_ok()
    }
}

/// Preview referenced by JpegInterchangeFormat/JpegInterchangeFormatLength.
pub(crate) fn interchange_location(ifd: &Ifd, reader: &TiffReader<'_>) -> Option<PreviewLocation> {
    let order = reader.order();
    let offset = ifd.get(TAG_JPEG_OFFSET)?.scalar(order);
    let length = ifd.get(TAG_JPEG_LENGTH)?.scalar(order);
    Some(PreviewLocation { offset, length })
}

/// Preview referenced by the first StripOffsets/StripByteCounts pair.
pub(crate) fn strip_location(ifd: &Ifd, reader: &TiffReader<'_>) -> Option<PreviewLocation> {
    let order = reader.order();
    let offset = ifd.get(TAG_STRIP_OFFSETS)?.scalar(order);
    let length = ifd.get(TAG_STRIP_BYTE_COUNTS)?.scalar(order);
    Some(PreviewLocation { offset, length })
}

/// Offsets of the SubIFDs listed in `ifd`.
///
/// A single pointer is stored inline; several are stored as an array at the
/// value offset.
pub(crate) fn sub_ifd_offsets(ifd: &Ifd, reader: &mut TiffReader<'_>) -> Vec<u32> {
    let Some(entry) = ifd.get(TAG_SUBIFD).copied() else {
        return Vec::new();
    };
    match entry.count {
        0 => Vec::new(),
        1 => vec![entry.scalar(reader.order())],
        n => (0..n.min(16))
            .filter_map(|i| reader.u32_at(entry.value_offset.checked_add(i * 4)?).ok())
            .collect(),
    }
}

/// JPEG preview in one IFD's entries: interchange format first, then
/// JPEG-compressed strips.
fn location_in_entries(ifd: &Ifd, reader: &TiffReader<'_>) -> Option<PreviewLocation> {
    let file_bytes = reader.bytes();

    if let Some(loc) = interchange_location(ifd, reader) {
        if loc.is_valid_in(file_bytes) {
            return Some(loc);
        }
    }

    let is_jpeg = ifd
        .get(TAG_COMPRESSION)
        .map(|e| {
            let c = e.scalar(reader.order());
            c == COMPRESSION_JPEG || c == COMPRESSION_JPEG_OLD
        })
        .unwrap_or(false);
    if is_jpeg {
        if let Some(loc) = strip_location(ifd, reader) {
            if loc.is_valid_in(file_bytes) {
                return Some(loc);
            }
        }
    }

    None
}

/// Search a TIFF raw file for its largest plausible preview.
///
/// Tries, in order: SubIFDs (when the preview is full-size), IFD1, IFD0,
/// and finally a scan for JPEG markers.
pub(crate) fn find_preview(bytes: &[u8]) -> Result<PreviewLocation, DecodeError> {
    let mut reader = TiffReader::new(bytes)?;
    let ifd0 = reader.ifd0()?;

    for offset in sub_ifd_offsets(&ifd0, &mut reader) {
        if let Ok(sub) = reader.ifd_at(offset) {
            if let Some(loc) = location_in_entries(&sub, &reader) {
                if loc.length > MIN_SUBIFD_PREVIEW {
                    return Ok(loc);
                }
            }
        }
    }

    if ifd0.next != 0 {
        if let Ok(ifd1) = reader.ifd_at(ifd0.next) {
            if let Some(loc) = location_in_entries(&ifd1, &reader) {
                return Ok(loc);
            }
        }
    }

    if let Some(loc) = location_in_entries(&ifd0, &reader) {
        return Ok(loc);
    }

    scan_for_jpeg(bytes).ok_or(DecodeError::NoThumbnail)
}

/// Scan for an embedded JPEG by looking for SOI/EOI markers.
/// Fallback for files whose IFDs do not reference the preview.
fn scan_for_jpeg(bytes: &[u8]) -> Option<PreviewLocation> {
    // Skip the first few KB to avoid the main TIFF structure
    let start_offset = 8192.min(bytes.len());
    const MIN_PREVIEW_SIZE: usize = 50_000;

    // The earliest SOI paired with the last EOI gives the longest candidate;
    // any later SOI can only be shorter.
    let end = bytes.windows(2).rposition(|w| w == JPEG_END)? + 2;
    let start = (start_offset..end.saturating_sub(2)).find(|&i| is_jpeg_data(&bytes[i..]))?;

    if end - start > MIN_PREVIEW_SIZE {
        Some(PreviewLocation {
            offset: start as u32,
            length: (end - start) as u32,
        })
    } else {
        None
    }
}
