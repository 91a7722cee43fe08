pub const DEFAULT_QUALITY: u8 = 70;
pub const MIN_QUALITY: u8 = 10;
pub const MAX_QUALITY: u8 = 95;

/// Default pre-flight cap on the aggregate input size, in KB.
pub const DEFAULT_ADMISSION_LIMIT_KB: u64 = 200_000;
pub const BYTES_PER_KB: u64 = 1024;

pub const ZOPFLI_QUALITY_THRESHOLD: u8 = 90;
pub const LIBDEFLATER_QUALITY_THRESHOLD: u8 = 70;
pub const OXIPNG_PRESET: u8 = 4;
pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

pub const ARCHIVE_FILE_NAME: &str = "compressed_images.zip";
pub const ARCHIVE_MIME_TYPE: &str = "application/zip";
pub const SINGLE_OUTPUT_PREFIX: &str = "compressed_";

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
