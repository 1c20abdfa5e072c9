//! Fixture builders shared by the unit tests.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// RGB gradient pixels, detailed enough that quality changes the output size.
pub fn gradient_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push((x * 255 / width.max(1)) as u8);
            pixels.push((y * 255 / height.max(1)) as u8);
            pixels.push(((x * 31 + y * 17) % 256) as u8);
        }
    }
    pixels
}

/// Colour JPEG of a gradient.
pub fn gradient_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    encode(&gradient_pixels(width, height), width, height, ExtendedColorType::Rgb8, quality)
}

/// Single-component (greyscale) JPEG.
pub fn grey_jpeg(width: u32, height: u32) -> Vec<u8> {
    let pixels: Vec<u8> = (0..width * height).map(|i| (i * 7 % 256) as u8).collect();
    encode(&pixels, width, height, ExtendedColorType::L8, 90)
}

fn encode(pixels: &[u8], width: u32, height: u32, color: ExtendedColorType, quality: u8) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width, height, color)
        .expect("fixture encodes");
    buffer.into_inner()
}

/// A fresh directory under the system temp dir, unique per call.
pub fn temp_dir(label: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "rawjpeg-core-{}-{}-{}",
        label,
        std::process::id(),
        n
    ));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
