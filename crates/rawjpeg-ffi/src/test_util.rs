//! Fixtures for the boundary tests.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Colour JPEG of the given size.
pub fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x * 8) as u8, (y * 8) as u8, ((x + y) * 4) as u8]);
        }
    }
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, 90)
        .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
        .expect("fixture encodes");
    buffer.into_inner()
}

/// Little-endian CR2 with `preview` as its IFD0 strip and the given
/// orientation.
pub fn cr2_fixture(preview: &[u8], orientation: u16) -> Vec<u8> {
    const IFD0: u32 = 16;
    const ENTRIES: u16 = 3;
    let data = IFD0 + 2 + ENTRIES as u32 * 12 + 4;

    let mut out = Vec::new();
    out.extend_from_slice(b"II\x2A\x00");
    out.extend_from_slice(&IFD0.to_le_bytes());
    out.extend_from_slice(b"CR\x02\x00");
    out.extend_from_slice(&0u32.to_le_bytes());

    out.extend_from_slice(&ENTRIES.to_le_bytes());
    for (tag, field_type, value) in [
        (0x0111u16, 4u16, data),
        (0x0112, 3, orientation as u32),
        (0x0117, 4, preview.len() as u32),
    ] {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&field_type.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(preview);
    out
}

/// A fresh directory under the system temp dir, unique per call.
pub fn temp_dir(label: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "rawjpeg-ffi-{}-{}-{}",
        label,
        std::process::id(),
        n
    ));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
