pub mod archive;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod constants;
pub mod error;
pub mod formats;
pub mod info;
pub mod input;
pub mod logger;
pub mod pipeline;
pub mod utils;

pub use archive::{build_archive, write_archive, ArchiveEntry};
pub use codec::{decode, encode_image, Codec, EncodedImage, ImageCodec, Quality};
pub use error::{CompressionError, Result};
pub use formats::OutputFormat;
pub use info::{inspect, ImageInfo};
pub use pipeline::{
    process_batch, AdmissionLimit, BatchOutput, BatchPipeline, BatchReport, BatchRun,
    BatchSummary, CompressionResult, Download, ImageItem, ItemFailure, ItemOutcome,
    ProgressEvent, RunState,
};
