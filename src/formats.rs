//! Image format utilities and type-safe format handling
//!
//! Maps the formats `image` can detect onto the small set this crate knows
//! how to re-encode with a quality setting.

use crate::error::{CompressionError, Result};
use image::ImageFormat;
use std::fmt;

/// Formats an image can be re-encoded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// JPEG, lossy; quality maps directly onto the encoder
    Jpeg,
    /// PNG, lossless; quality selects the optimisation effort
    Png,
    /// WebP, lossy; quality maps directly onto the encoder
    WebP,
}

impl OutputFormat {
    /// Format used when the source format of an image is unknown
    pub const FALLBACK: OutputFormat = OutputFormat::Jpeg;

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// Pick the output format for an image whose source format was detected
    /// as `detected`. A known format that cannot be re-encoded with a quality
    /// setting is an error; an unknown one falls back to JPEG.
    pub fn for_source(detected: Option<ImageFormat>) -> Result<Self> {
        match detected {
            Some(ImageFormat::Jpeg) => Ok(OutputFormat::Jpeg),
            Some(ImageFormat::Png) => Ok(OutputFormat::Png),
            Some(ImageFormat::WebP) => Ok(OutputFormat::WebP),
            Some(other) => Err(CompressionError::UnsupportedFormat(format!(
                "{:?} images cannot be re-encoded with a quality setting",
                other
            ))),
            None => Ok(Self::FALLBACK),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}
