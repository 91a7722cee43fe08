use crate::codec::decode;
use crate::error::Result;
use crate::formats::OutputFormat;
use image::{ColorType, GenericImageView, ImageFormat};

/// What the pipeline would see for one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
    pub detected_format: Option<ImageFormat>,
    /// `None` when the detected format cannot be re-encoded with a quality setting
    pub reencode_as: Option<OutputFormat>,
}

impl ImageInfo {
    pub fn megapixels(&self) -> f64 {
        (self.width as u64 * self.height as u64) as f64 / 1_000_000.0
    }

    /// Estimated in-memory footprint of the decoded image, in MB
    pub fn estimated_memory_mb(&self) -> f64 {
        let total_bytes = self.width as u64 * self.height as u64 * self.color.bytes_per_pixel() as u64;
        total_bytes as f64 / (1024.0 * 1024.0)
    }
}

pub fn inspect(data: &[u8]) -> Result<ImageInfo> {
    let (img, detected_format) = decode(data)?;
    let (width, height) = img.dimensions();

    Ok(ImageInfo {
        size: data.len() as u64,
        width,
        height,
        color: img.color(),
        detected_format,
        reencode_as: OutputFormat::for_source(detected_format).ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressionError;
    use image::DynamicImage;
    use std::io::Cursor;

    fn encoded(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, format).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_inspect_png() {
        let data = encoded(&DynamicImage::new_rgba8(40, 30), ImageFormat::Png);

        let info = inspect(&data).unwrap();

        assert_eq!((info.width, info.height), (40, 30));
        assert_eq!(info.size, data.len() as u64);
        assert_eq!(info.detected_format, Some(ImageFormat::Png));
        assert_eq!(info.reencode_as, Some(OutputFormat::Png));
        assert_eq!(info.color, ColorType::Rgba8);
    }

    #[test]
    fn test_inspect_gif_is_not_reencodable() {
        let data = encoded(&DynamicImage::new_rgb8(4, 4), ImageFormat::Gif);

        let info = inspect(&data).unwrap();

        assert_eq!(info.detected_format, Some(ImageFormat::Gif));
        assert_eq!(info.reencode_as, None);
    }

    #[test]
    fn test_inspect_garbage() {
        assert!(matches!(
            inspect(b"plain text"),
            Err(CompressionError::Decode(_))
        ));
    }

    #[test]
    fn test_metrics() {
        let data = encoded(&DynamicImage::new_rgb8(2000, 1000), ImageFormat::Png);
        let info = inspect(&data).unwrap();

        assert_eq!(info.megapixels(), 2.0);
        assert!((info.estimated_memory_mb() - 5.722).abs() < 0.01);
    }
}
