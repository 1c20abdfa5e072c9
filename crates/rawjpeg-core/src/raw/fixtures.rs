//! Synthetic TIFF/CR2/NEF files for the raw parser tests.

use super::tiff::{
    ByteOrder, TAG_JPEG_LENGTH, TAG_JPEG_OFFSET, TAG_STRIP_BYTE_COUNTS, TAG_STRIP_OFFSETS,
    TAG_SUBIFD, TIFF_MAGIC_BE, TIFF_MAGIC_LE, TYPE_SHORT,
};

pub(crate) const TYPE_ASCII: u16 = 2;
pub(crate) const TYPE_LONG: u16 = 4;
pub(crate) const TAG_ORIENTATION: u16 = 0x0112;
pub(crate) const TAG_EXIF_IFD: u16 = 0x8769;
pub(crate) const TAG_CREATE_DATE: u16 = 0x9004;

/// (tag, type, count, value)
pub(crate) type Entry = (u16, u16, u32, u32);

fn u16_bytes(order: ByteOrder, v: u16) -> [u8; 2] {
    match order {
        ByteOrder::LittleEndian => v.to_le_bytes(),
        ByteOrder::BigEndian => v.to_be_bytes(),
    }
}

fn u32_bytes(order: ByteOrder, v: u32) -> [u8; 4] {
    match order {
        ByteOrder::LittleEndian => v.to_le_bytes(),
        ByteOrder::BigEndian => v.to_be_bytes(),
    }
}

/// Encode one IFD entry; SHORT values are stored left-justified.
pub(crate) fn ifd_entry(order: ByteOrder, tag: u16, field_type: u16, count: u32, value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(12);
    out.extend_from_slice(&u16_bytes(order, tag));
    out.extend_from_slice(&u16_bytes(order, field_type));
    out.extend_from_slice(&u32_bytes(order, count));
    if field_type == TYPE_SHORT && count == 1 {
        out.extend_from_slice(&u16_bytes(order, value as u16));
        out.extend_from_slice(&[0, 0]);
    } else {
        out.extend_from_slice(&u32_bytes(order, value));
    }
    out
}

/// Append-only TIFF builder. Data blocks are written first so IFDs can
/// point at them.
pub(crate) struct Tiff {
    order: ByteOrder,
    buf: Vec<u8>,
}

impl Tiff {
    pub fn new(order: ByteOrder) -> Self {
        let mut buf = match order {
            ByteOrder::LittleEndian => TIFF_MAGIC_LE.to_vec(),
            ByteOrder::BigEndian => TIFF_MAGIC_BE.to_vec(),
        };
        buf.extend_from_slice(&u32_bytes(order, 0));
        Self { order, buf }
    }

    /// TIFF header followed by the CR2 signature, version 2.0 and a zero
    /// raw-IFD pointer.
    pub fn cr2(order: ByteOrder) -> Self {
        let mut tiff = Self::new(order);
        tiff.buf.extend_from_slice(b"CR");
        tiff.buf.extend_from_slice(&[2, 0]);
        tiff.buf.extend_from_slice(&u32_bytes(order, 0));
        tiff
    }

    /// Append raw bytes at the next even offset and return that offset.
    pub fn append(&mut self, data: &[u8]) -> u32 {
        if self.buf.len() % 2 == 1 {
            self.buf.push(0);
        }
        let at = self.buf.len() as u32;
        self.buf.extend_from_slice(data);
        at
    }

    /// Write an IFD with no successor and return its offset.
    pub fn ifd(&mut self, entries: &[Entry]) -> u32 {
        let mut sorted = entries.to_vec();
        sorted.sort_by_key(|e| e.0);

        let mut data = Vec::new();
        data.extend_from_slice(&u16_bytes(self.order, sorted.len() as u16));
        for &(tag, typ, count, value) in &sorted {
            data.extend_from_slice(&ifd_entry(self.order, tag, typ, count, value));
        }
        data.extend_from_slice(&u32_bytes(self.order, 0));
        self.append(&data)
    }

    /// Write an IFD and point the header at it.
    pub fn ifd0(&mut self, entries: &[Entry]) -> u32 {
        let at = self.ifd(entries);
        let bytes = u32_bytes(self.order, at);
        self.buf[4..8].copy_from_slice(&bytes);
        at
    }

    /// Set the next-IFD pointer of the IFD at `from`.
    pub fn link(&mut self, from: u32, to: u32) {
        let from = from as usize;
        let raw = [self.buf[from], self.buf[from + 1]];
        let count = match self.order {
            ByteOrder::LittleEndian => u16::from_le_bytes(raw),
            ByteOrder::BigEndian => u16::from_be_bytes(raw),
        } as usize;
        let at = from + 2 + count * 12;
        let bytes = u32_bytes(self.order, to);
        self.buf[at..at + 4].copy_from_slice(&bytes);
    }

    /// Exif sub-IFD holding a CreateDate; returns the IFD0 pointer entry.
    pub fn exif_date(&mut self, date: &str) -> Entry {
        let mut ascii = date.as_bytes().to_vec();
        ascii.push(0);
        let at = self.append(&ascii);
        let exif = self.ifd(&[(TAG_CREATE_DATE, TYPE_ASCII, ascii.len() as u32, at)]);
        (TAG_EXIF_IFD, TYPE_LONG, 1, exif)
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

fn common_entries(tiff: &mut Tiff, orientation: u16, date: Option<&str>) -> Vec<Entry> {
    let mut entries = vec![(TAG_ORIENTATION, TYPE_SHORT, 1, orientation as u32)];
    if let Some(date) = date {
        entries.push(tiff.exif_date(date));
    }
    entries
}

/// CR2 layout: preview referenced by IFD0 strip offset/byte count.
pub(crate) fn cr2_file(order: ByteOrder, jpeg: &[u8], orientation: u16, date: Option<&str>) -> Vec<u8> {
    let mut tiff = Tiff::cr2(order);
    let preview = tiff.append(jpeg);
    let mut entries = common_entries(&mut tiff, orientation, date);
    entries.push((TAG_STRIP_OFFSETS, TYPE_LONG, 1, preview));
    entries.push((TAG_STRIP_BYTE_COUNTS, TYPE_LONG, 1, jpeg.len() as u32));
    tiff.ifd0(&entries);
    tiff.finish()
}

/// NEF layout: preview in SubIFD 0 via JpegInterchangeFormat. `sub_ifds`
/// extra dummy SubIFDs are listed after it to exercise the pointer array.
pub(crate) fn nef_file(
    order: ByteOrder,
    jpeg: &[u8],
    orientation: u16,
    date: Option<&str>,
    sub_ifds: usize,
) -> Vec<u8> {
    let mut tiff = Tiff::new(order);
    let preview = tiff.append(jpeg);
    let sub0 = tiff.ifd(&[
        (TAG_JPEG_OFFSET, TYPE_LONG, 1, preview),
        (TAG_JPEG_LENGTH, TYPE_LONG, 1, jpeg.len() as u32),
    ]);

    let mut entries = common_entries(&mut tiff, orientation, date);
    if sub_ifds == 0 {
        entries.push((TAG_SUBIFD, TYPE_LONG, 1, sub0));
    } else {
        let mut pointers = u32_bytes(order, sub0).to_vec();
        for _ in 0..sub_ifds {
            let dummy = tiff.ifd(&[]);
            pointers.extend_from_slice(&u32_bytes(order, dummy));
        }
        let array = tiff.append(&pointers);
        entries.push((TAG_SUBIFD, TYPE_LONG, (sub_ifds + 1) as u32, array));
    }
    tiff.ifd0(&entries);
    tiff.finish()
}
