use crate::constants::{
    DEFAULT_QUALITY, LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, LIBDEFLATER_QUALITY_THRESHOLD,
    MAX_QUALITY, MIN_QUALITY, OXIPNG_PRESET, ZOPFLI_ITERATIONS, ZOPFLI_QUALITY_THRESHOLD,
};
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, ImageReader};
use mozjpeg::{ColorSpace, Compress};
use oxipng::{Deflaters, Options, StripChunks};
use std::fmt;
use std::io::Cursor;
use std::num::NonZeroU8;

/// Re-encoding quality, always within `MIN_QUALITY..=MAX_QUALITY`.
///
/// Higher values favour fidelity over size. Holding a `Quality` is the
/// precondition for calling a [`Codec`], so range checks happen once, where
/// the value enters the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Result<Self> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&value) {
            return Err(CompressionError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

impl TryFrom<u8> for Quality {
    type Error = CompressionError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A re-encoded image held in memory.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

/// Turns raw image bytes into re-encoded bytes at a given quality.
pub trait Codec {
    /// Re-encode `raw`, keeping its format where possible.
    ///
    /// # Errors
    /// * `CompressionError::Decode` if `raw` is not a recognizable image
    /// * `CompressionError::UnsupportedFormat` if the detected format cannot
    ///   be re-encoded with a quality setting
    fn encode(&self, raw: &[u8], quality: Quality) -> Result<EncodedImage>;
}

/// [`Codec`] that decodes with `image` and encodes with `mozjpeg`, `oxipng`
/// and `webp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn encode(&self, raw: &[u8], quality: Quality) -> Result<EncodedImage> {
        let (img, detected) = decode(raw)?;
        encode_image(&img, detected, quality)
    }
}

/// Decodes an in-memory payload, sniffing its format from the content.
///
/// # Returns
/// * `Ok((image, format))` - The decoded image and the detected source format
/// * `Err(CompressionError::Decode)` - If the bytes are not a decodable image
pub fn decode(raw: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>)> {
    let reader = ImageReader::new(Cursor::new(raw)).with_guessed_format()?;
    let detected = reader.format();
    let img = reader.decode().map_err(CompressionError::Decode)?;
    Ok((img, detected))
}

/// Re-encodes an already decoded image.
///
/// `source` is the format the image came from; `None` selects
/// [`OutputFormat::FALLBACK`]. Dimensions are never changed and ancillary
/// metadata is not carried over.
pub fn encode_image(
    img: &DynamicImage,
    source: Option<ImageFormat>,
    quality: Quality,
) -> Result<EncodedImage> {
    let format = OutputFormat::for_source(source)?;
    let data = match format {
        OutputFormat::Jpeg => encode_jpeg(img, quality)?,
        OutputFormat::Png => encode_png(img, quality)?,
        OutputFormat::WebP => encode_webp(img, quality)?,
    };

    let (width, height) = img.dimensions();
    Ok(EncodedImage {
        data,
        format,
        width,
        height,
    })
}

fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>> {
    // JPEG has no alpha channel and no 16-bit mode
    let (color_space, pixels) = match img.color() {
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            (ColorSpace::JCS_GRAYSCALE, img.to_luma8().into_raw())
        }
        _ => (ColorSpace::JCS_RGB, img.to_rgb8().into_raw()),
    };
    let (width, height) = img.dimensions();

    let mut comp = Compress::new(color_space);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality.value() as f32);
    comp.set_optimize_coding(true);

    let mut buf = Vec::new();
    let mut writer = comp.start_compress(&mut buf).map_err(jpeg_error)?;
    writer.write_scanlines(&pixels).map_err(jpeg_error)?;
    writer.finish().map_err(jpeg_error)?;
    Ok(buf)
}

fn jpeg_error(e: std::io::Error) -> CompressionError {
    CompressionError::JpegEncoding(e.to_string())
}

fn encode_png(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut buf))
        .map_err(CompressionError::Encode)?;

    oxipng::optimize_from_memory(&buf, &png_options(quality))
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}

/// oxipng settings for a quality level: higher quality spends more effort.
fn png_options(quality: Quality) -> Options {
    let mut options = Options::from_preset(OXIPNG_PRESET);
    options.strip = StripChunks::Safe;

    options.deflate = if quality.value() >= ZOPFLI_QUALITY_THRESHOLD {
        Deflaters::Zopfli {
            iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap_or(NonZeroU8::MIN),
        }
    } else if quality.value() >= LIBDEFLATER_QUALITY_THRESHOLD {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    };
    options
}

fn encode_webp(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();

    let pixels;
    let encoder = if img.color().has_alpha() {
        pixels = img.to_rgba8().into_raw();
        webp::Encoder::from_rgba(&pixels, width, height)
    } else {
        pixels = img.to_rgb8().into_raw();
        webp::Encoder::from_rgb(&pixels, width, height)
    };

    let memory = encoder
        .encode_simple(false, quality.value() as f32)
        .map_err(|e| CompressionError::WebPEncoding(format!("{:?}", e)))?;
    Ok(memory.to_vec())
}
