//! Sequential batch re-encoding.
//!
//! A batch is admitted once against an [`AdmissionLimit`], then each
//! [`ImageItem`] is re-encoded in input order. A [`BatchRun`] is a lazy
//! iterator of [`ProgressEvent`]s, one per item, so callers can render
//! progress without the pipeline holding any UI state. Items that fail to
//! re-encode are recorded as [`ItemFailure`]s and the batch carries on.

use crate::archive::{build_archive, ArchiveEntry};
use crate::codec::{Codec, ImageCodec, Quality};
use crate::constants::{
    ARCHIVE_FILE_NAME, ARCHIVE_MIME_TYPE, BYTES_PER_KB, DEFAULT_ADMISSION_LIMIT_KB,
    SINGLE_OUTPUT_PREFIX,
};
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::utils::space_saved_percent;
use std::iter::Enumerate;
use std::vec::IntoIter;
use tracing::{debug, error, info, warn};

/// One uploaded image: its name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    name: String,
    data: Vec<u8>,
}

impl ImageItem {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Upper bound on the total input size of one batch, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AdmissionLimit(u64);

impl AdmissionLimit {
    pub fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    pub fn from_kb(kb: u64) -> Self {
        Self(kb.saturating_mul(BYTES_PER_KB))
    }

    pub fn bytes(&self) -> u64 {
        self.0
    }

    /// Rejects a batch whose aggregate input size exceeds the limit.
    pub fn check(&self, total: u64) -> Result<()> {
        if total > self.0 {
            return Err(CompressionError::AdmissionLimitExceeded {
                total,
                limit: self.0,
            });
        }
        Ok(())
    }
}

impl Default for AdmissionLimit {
    fn default() -> Self {
        Self::from_kb(DEFAULT_ADMISSION_LIMIT_KB)
    }
}

/// A successfully re-encoded item.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub name: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub data: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl CompressionResult {
    pub fn space_saved_percent(&self) -> Option<f64> {
        space_saved_percent(self.original_size, self.compressed_size)
    }
}

/// An item the codec could not re-encode.
#[derive(Debug)]
pub struct ItemFailure {
    /// Position of the item in the submitted batch
    pub index: usize,
    pub name: String,
    pub error: CompressionError,
}

/// Aggregate statistics for one batch, in input order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total_original: u64,
    pub total_compressed: u64,
    pub results: Vec<CompressionResult>,
    pub failures: Vec<ItemFailure>,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// `None` when nothing was processed or every processed item was empty.
    pub fn space_saved_percent(&self) -> Option<f64> {
        space_saved_percent(self.total_original, self.total_compressed)
    }

    fn record(&mut self, result: CompressionResult) {
        self.total_original += result.original_size;
        self.total_compressed += result.compressed_size;
        self.results.push(result);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Compressed {
        original_size: u64,
        compressed_size: u64,
    },
    Failed {
        reason: String,
    },
}

/// Emitted once per item, after the item has been handled.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub index: usize,
    pub total: usize,
    pub name: String,
    pub outcome: ItemOutcome,
}

impl ProgressEvent {
    /// 1-based position of the item, for "image 2/5" style display
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn percent(&self) -> u8 {
        (self.position() * 100 / self.total.max(1)) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Processing,
    Done,
}

/// What the caller should hand to the user once a batch is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutput {
    /// Single-item batch; index into `BatchSummary::results`
    Single { index: usize },
    /// Multi-item batch; a deflate ZIP of every result in input order
    Archive(Vec<u8>),
}

/// A file ready to be downloaded or written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download<'a> {
    pub file_name: String,
    pub mime_type: &'static str,
    pub data: &'a [u8],
}

#[derive(Debug)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub output: Option<BatchOutput>,
}

impl BatchReport {
    pub fn download(&self) -> Option<Download<'_>> {
        match self.output.as_ref()? {
            BatchOutput::Single { index } => {
                let result = self.summary.results.get(*index)?;
                Some(Download {
                    file_name: format!("{}{}", SINGLE_OUTPUT_PREFIX, result.name),
                    mime_type: result.format.mime_type(),
                    data: &result.data,
                })
            }
            BatchOutput::Archive(blob) => Some(Download {
                file_name: ARCHIVE_FILE_NAME.to_string(),
                mime_type: ARCHIVE_MIME_TYPE,
                data: blob,
            }),
        }
    }
}

/// Re-encodes batches of images at one quality under one admission limit.
#[derive(Debug, Clone)]
pub struct BatchPipeline<C = ImageCodec> {
    codec: C,
    quality: Quality,
    limit: AdmissionLimit,
}

impl BatchPipeline<ImageCodec> {
    pub fn new(quality: Quality, limit: AdmissionLimit) -> Self {
        Self::with_codec(ImageCodec, quality, limit)
    }
}

impl<C: Codec> BatchPipeline<C> {
    pub fn with_codec(codec: C, quality: Quality, limit: AdmissionLimit) -> Self {
        Self {
            codec,
            quality,
            limit,
        }
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn limit(&self) -> AdmissionLimit {
        self.limit
    }

    /// Admits a batch and returns a run that processes it lazily.
    ///
    /// # Errors
    /// * `CompressionError::AdmissionLimitExceeded` if the summed item sizes
    ///   exceed the limit; nothing is processed in that case
    pub fn start(&self, items: Vec<ImageItem>) -> Result<BatchRun<'_, C>> {
        let total_bytes: u64 = items.iter().map(ImageItem::size).sum();
        info!(
            items = items.len(),
            total_bytes,
            limit = self.limit.bytes(),
            quality = self.quality.value(),
            "admitting batch"
        );

        if let Err(e) = self.limit.check(total_bytes) {
            warn!(error = %e, "batch rejected");
            return Err(e);
        }

        Ok(BatchRun {
            codec: &self.codec,
            quality: self.quality,
            total: items.len(),
            pending: items.into_iter().enumerate(),
            summary: BatchSummary::default(),
        })
    }

    /// Admits and fully processes a batch.
    pub fn process(&self, items: Vec<ImageItem>) -> Result<BatchReport> {
        self.start(items)?.finish()
    }
}

/// Re-encodes `items` with the `image`-backed codec.
pub fn process_batch(
    items: Vec<ImageItem>,
    quality: Quality,
    limit: AdmissionLimit,
) -> Result<BatchReport> {
    BatchPipeline::new(quality, limit).process(items)
}

/// An admitted batch. Each call to `next` re-encodes one item.
///
/// Items are moved out of the queue as they are handled, so an item's raw
/// bytes are released as soon as its result has been recorded.
pub struct BatchRun<'p, C> {
    codec: &'p C,
    quality: Quality,
    total: usize,
    pending: Enumerate<IntoIter<ImageItem>>,
    summary: BatchSummary,
}

impl<C: Codec> BatchRun<'_, C> {
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn state(&self) -> RunState {
        if self.pending.len() == 0 {
            RunState::Done
        } else {
            RunState::Processing
        }
    }

    /// Running statistics for the items handled so far.
    pub fn summary(&self) -> &BatchSummary {
        &self.summary
    }

    /// Processes any remaining items and assembles the output.
    pub fn finish(mut self) -> Result<BatchReport> {
        self.by_ref().for_each(drop);

        let output = match self.total {
            0 => None,
            1 => (!self.summary.results.is_empty()).then_some(BatchOutput::Single { index: 0 }),
            _ => {
                let entries = self.summary.results.iter().map(|result| ArchiveEntry {
                    name: &result.name,
                    data: &result.data,
                });
                Some(BatchOutput::Archive(build_archive(entries)?))
            }
        };

        info!(
            processed = self.summary.processed(),
            failed = self.summary.failed(),
            total_original = self.summary.total_original,
            total_compressed = self.summary.total_compressed,
            "batch complete"
        );

        Ok(BatchReport {
            summary: self.summary,
            output,
        })
    }
}

impl<C: Codec> Iterator for BatchRun<'_, C> {
    type Item = ProgressEvent;

    fn next(&mut self) -> Option<ProgressEvent> {
        let (index, item) = self.pending.next()?;
        let ImageItem { name, data } = item;
        let original_size = data.len() as u64;

        let encoded = self.codec.encode(&data, self.quality);
        drop(data);

        let outcome = match encoded {
            Ok(encoded) => {
                let compressed_size = encoded.data.len() as u64;
                debug!(
                    index,
                    name = %name,
                    original_size,
                    compressed_size,
                    format = %encoded.format,
                    "item compressed"
                );
                self.summary.record(CompressionResult {
                    name: name.clone(),
                    original_size,
                    compressed_size,
                    data: encoded.data,
                    format: encoded.format,
                    width: encoded.width,
                    height: encoded.height,
                });
                ItemOutcome::Compressed {
                    original_size,
                    compressed_size,
                }
            }
            Err(e) => {
                if e.is_item_failure() {
                    warn!(index, name = %name, error = %e, "skipping item");
                } else {
                    error!(index, name = %name, error = %e, "skipping item after unexpected error");
                }
                let reason = e.to_string();
                self.summary.failures.push(ItemFailure {
                    index,
                    name: name.clone(),
                    error: e,
                });
                ItemOutcome::Failed { reason }
            }
        };

        Some(ProgressEvent {
            index,
            total: self.total,
            name,
            outcome,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pending.size_hint()
    }
}
