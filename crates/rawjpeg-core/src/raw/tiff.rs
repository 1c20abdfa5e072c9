//! Minimal TIFF structure reader.
//!
//! Camera raw formats such as CR2, NEF and ARW are TIFF containers. Only the
//! header and the 12-byte IFD entries are decoded here; values are
//! interpreted by the callers.
//!
//! TIFF specification: https://www.itu.int/itudoc/itu-t/com16/tiff-fx/docs/tiff6.pdf

use std::io::{Cursor, Read, Seek, SeekFrom};

use crate::decode::DecodeError;

// TIFF constants
pub(crate) const TIFF_MAGIC_LE: [u8; 4] = [0x49, 0x49, 0x2A, 0x00]; // II + 42
pub(crate) const TIFF_MAGIC_BE: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A]; // MM + 42

// TIFF tag IDs
pub(crate) const TAG_COMPRESSION: u16 = 0x0103;
pub(crate) const TAG_STRIP_OFFSETS: u16 = 0x0111;
pub(crate) const TAG_STRIP_BYTE_COUNTS: u16 = 0x0117;
pub(crate) const TAG_SUBIFD: u16 = 0x014A;
pub(crate) const TAG_JPEG_OFFSET: u16 = 0x0201; // JpegInterchangeFormat
pub(crate) const TAG_JPEG_LENGTH: u16 = 0x0202; // JpegInterchangeFormatLength

// Field types
pub(crate) const TYPE_SHORT: u16 = 3;

const MAX_IFD_ENTRIES: u16 = 1000;

/// Byte order declared in the TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// One 12-byte IFD entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IfdEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    /// Either the value itself (when it fits in four bytes) or the file
    /// offset of the value, as read in file byte order.
    pub value_offset: u32,
}

impl IfdEntry {
    /// Interpret the value field as a single SHORT or LONG.
    ///
    /// A SHORT is left-justified in the four-byte field, which puts it in the
    /// high half of a big-endian read and the low half of a little-endian one.
    pub fn scalar(&self, order: ByteOrder) -> u32 {
        if self.field_type != TYPE_SHORT {
            return self.value_offset;
        }
        match order {
            ByteOrder::BigEndian => self.value_offset >> 16,
            ByteOrder::LittleEndian => self.value_offset & 0xFFFF,
        }
    }
}

/// A parsed image file directory.
#[derive(Debug, Clone, Default)]
pub(crate) struct Ifd {
    pub entries: Vec<IfdEntry>,
    /// Offset of the next IFD in the chain, 0 when this is the last.
    pub next: u32,
}

impl Ifd {
    pub fn get(&self, tag: u16) -> Option<&IfdEntry> {
        self.entries.iter().find(|e| e.tag == tag)
    }
}

/// Random-access reader over an in-memory TIFF file.
pub(crate) struct TiffReader<'a> {
    cursor: Cursor<&'a [u8]>,
    order: ByteOrder,
    ifd0_offset: u32,
}

impl<'a> TiffReader<'a> {
    /// Validate the 8-byte TIFF header and remember its byte order.
    pub fn new(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::new(bytes);

        let mut header = [0u8; 4];
        cursor
            .read_exact(&mut header)
            .map_err(|e| DecodeError::CorruptedFile(format!("Failed to read header: {}", e)))?;

        let order = if header == TIFF_MAGIC_LE {
            ByteOrder::LittleEndian
        } else if header == TIFF_MAGIC_BE {
            ByteOrder::BigEndian
        } else {
            return Err(DecodeError::InvalidFormat);
        };

        let mut reader = Self {
            cursor,
            order,
            ifd0_offset: 0,
        };
        reader.ifd0_offset = reader.read_u32()?;
        Ok(reader)
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn bytes(&self) -> &'a [u8] {
        *self.cursor.get_ref()
    }

    /// Parse the first IFD.
    pub fn ifd0(&mut self) -> Result<Ifd, DecodeError> {
        self.ifd_at(self.ifd0_offset)
    }

    /// Parse the IFD starting at `offset`.
    pub fn ifd_at(&mut self, offset: u32) -> Result<Ifd, DecodeError> {
        self.seek(offset)?;

        let entry_count = self.read_u16()?;
        if entry_count > MAX_IFD_ENTRIES {
            return Err(DecodeError::CorruptedFile(
                "Too many IFD entries".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            entries.push(IfdEntry {
                tag: self.read_u16()?,
                field_type: self.read_u16()?,
                count: self.read_u32()?,
                value_offset: self.read_u32()?,
            });
        }

        // A missing next-IFD pointer just ends the chain.
        let next = self.read_u32().unwrap_or(0);

        Ok(Ifd { entries, next })
    }

    /// Read a u32 stored at `offset` in file byte order.
    pub fn u32_at(&mut self, offset: u32) -> Result<u32, DecodeError> {
        self.seek(offset)?;
        self.read_u32()
    }

    fn seek(&mut self, offset: u32) -> Result<(), DecodeError> {
        if offset as usize >= self.bytes().len() {
            return Err(DecodeError::CorruptedFile(format!(
                "Offset {} is past end of file ({} bytes)",
                offset,
                self.bytes().len()
            )));
        }
        self.cursor
            .seek(SeekFrom::Start(offset as u64))
            .map_err(|e| DecodeError::CorruptedFile(format!("Failed to seek to {}: {}", offset, e)))?;
        Ok(())
    }

    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        read_u16(&mut self.cursor, self.order)
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        read_u32(&mut self.cursor, self.order)
    }
}

fn read_u16<R: Read>(reader: &mut R, order: ByteOrder) -> Result<u16, DecodeError> {
    let mut buf = [0u8; 2];
    reader
        .read_exact(&mut buf)
        .map_err(|e| DecodeError::CorruptedFile(format!("Failed to read u16: {}", e)))?;
    Ok(match order {
        ByteOrder::LittleEndian => u16::from_le_bytes(buf),
        ByteOrder::BigEndian => u16::from_be_bytes(buf),
    })
}

fn read_u32<R: Read>(reader: &mut R, order: ByteOrder) -> Result<u32, DecodeError> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| DecodeError::CorruptedFile(format!("Failed to read u32: {}", e)))?;
    Ok(match order {
        ByteOrder::LittleEndian => u32::from_le_bytes(buf),
        ByteOrder::BigEndian => u32::from_be_bytes(buf),
    })
}

/// Check if a file appears to be TIFF-based raw data based on its header.
pub fn is_raw_file(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && (bytes[..4] == TIFF_MAGIC_LE || bytes[..4] == TIFF_MAGIC_BE)
}
