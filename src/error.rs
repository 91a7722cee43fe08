use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a recognizable image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Image encoding error: {0}")]
    Encode(#[source] image::ImageError),

    #[error("JPEG encoding error: {0}")]
    JpegEncoding(String),

    #[error("WebP encoding error: {0}")]
    WebPEncoding(String),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Invalid quality value: {0}. Must be between 10 and 95")]
    InvalidQuality(u8),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Batch too large: {total} bytes submitted, maximum allowed {limit} bytes")]
    AdmissionLimitExceeded { total: u64, limit: u64 },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("No image files found in input path: {0}")]
    NoImageFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

impl CompressionError {
    /// Errors raised while re-encoding a single image. The pipeline records
    /// these against the item and moves on to the next one.
    pub fn is_item_failure(&self) -> bool {
        matches!(
            self,
            CompressionError::Decode(_)
                | CompressionError::Encode(_)
                | CompressionError::JpegEncoding(_)
                | CompressionError::WebPEncoding(_)
                | CompressionError::PngOptimization(_)
                | CompressionError::UnsupportedFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
