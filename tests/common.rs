#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Photo-like RGB image: a smooth gradient with per-pixel noise.
pub fn photo(width: u32, height: u32, seed: u32) -> DynamicImage {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let noise = (state % 48) as u8;
        Rgb([
            ((x * 255 / width.max(1)) as u8).saturating_add(noise),
            ((y * 255 / height.max(1)) as u8).saturating_add(noise / 2),
            (((x + y) * 127 / (width + height).max(1)) as u8).saturating_add(noise),
        ])
    }))
}

/// A photo saved as a near-lossless JPEG, the typical camera upload.
pub fn photo_jpeg(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    photo(width, height, seed)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 100))
        .unwrap();
    buf
}

/// A photo saved as a lossy WebP at `quality`, the usual WebP upload.
pub fn photo_webp(width: u32, height: u32, seed: u32, quality: f32) -> Vec<u8> {
    let rgb = photo(width, height, seed).to_rgb8();
    let memory = webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode(quality);
    memory.to_vec()
}

pub fn encoded(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, format).unwrap();
    cursor.into_inner()
}

pub fn photo_png(width: u32, height: u32, seed: u32) -> Vec<u8> {
    encoded(&photo(width, height, seed), ImageFormat::Png)
}

/// Bytes that no image decoder recognizes.
pub fn corrupt_payload(len: usize) -> Vec<u8> {
    b"corrupted upload "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}
