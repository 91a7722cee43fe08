use crate::codec::Quality;
use crate::constants::PROGRESS_BAR_TEMPLATE;
use crate::error::{CompressionError, Result};
use crate::info::{inspect, ImageInfo};
use crate::input::{collect_image_files, preflight, read_items};
use crate::pipeline::{AdmissionLimit, BatchPipeline, BatchReport, ItemOutcome};
use crate::utils::{format_file_size, format_kb, format_space_saved};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Runs one batch end to end and writes the result into `output_dir`.
///
/// # Returns
/// * `Ok(Some(path))` - Where the compressed file or archive was written
/// * `Ok(None)` - Every input failed, nothing was written
/// * `Err(CompressionError)` - No inputs, rejected batch, or an I/O failure
pub fn compress(
    inputs: &[String],
    output_dir: &Path,
    quality: Quality,
    limit: AdmissionLimit,
    recursive: bool,
) -> Result<Option<PathBuf>> {
    let files = collect_image_files(inputs, recursive)?;
    if files.is_empty() {
        return Err(CompressionError::NoImageFilesFound(inputs.join(" ")));
    }

    let pipeline = BatchPipeline::new(quality, limit);
    let total_bytes = preflight(&files, pipeline.limit())?;
    println!(
        "📊 Found {} image(s), {} of {} allowed. Processing at quality {}...",
        files.len(),
        format_kb(total_bytes),
        format_kb(pipeline.limit().bytes()),
        pipeline.quality()
    );

    let mut run = pipeline.start(read_items(&files)?)?;

    let progress = ProgressBar::new(run.total() as u64);
    progress.set_style(
        ProgressStyle::with_template(PROGRESS_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    for event in run.by_ref() {
        if let ItemOutcome::Failed { reason } = &event.outcome {
            progress.println(format!("❌ {}: {}", event.name, reason));
        }
        progress.set_message(format!("{}/{} {}", event.position(), event.total, event.name));
        progress.inc(1);
    }
    progress.finish_and_clear();

    let report = run.finish()?;
    print_summary(&report);
    write_download(&report, output_dir)
}

fn print_summary(report: &BatchReport) {
    let summary = &report.summary;

    match (summary.results.as_slice(), summary.failures.is_empty()) {
        ([result], true) => {
            println!("✅ Compressed: {}", result.name);
            println!(
                "📈 Original: {} → Compressed: {} (Saved: {})",
                format_kb(result.original_size),
                format_kb(result.compressed_size),
                format_space_saved(result.space_saved_percent())
            );
        }
        _ => {
            println!("✅ Compressed {} image(s)", summary.processed());
            println!("📊 Total original size: {}", format_kb(summary.total_original));
            println!("📊 Total compressed size: {}", format_kb(summary.total_compressed));
            println!(
                "🎯 Space saved: {}",
                format_space_saved(summary.space_saved_percent())
            );
        }
    }

    if !summary.failures.is_empty() {
        println!("⚠️  Failed images: {}", summary.failed());
        for failure in &summary.failures {
            println!("  ❌ {}: {}", failure.name, failure.error);
        }
    }
}

fn write_download(report: &BatchReport, output_dir: &Path) -> Result<Option<PathBuf>> {
    let Some(download) = report.download() else {
        println!("⚠️  Nothing to write: no image could be compressed");
        return Ok(None);
    };

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&download.file_name);
    fs::write(&path, download.data)?;

    println!(
        "💾 Saved {} ({}, {})",
        path.display(),
        download.mime_type,
        format_file_size(download.data.len() as u64)
    );
    Ok(Some(path))
}

pub fn info(input: &Path) -> Result<ImageInfo> {
    if !input.exists() {
        return Err(CompressionError::FileNotFound(input.to_path_buf()));
    }

    let data = fs::read(input)?;
    let info = inspect(&data)?;

    println!("📋 Image: {}", input.display());
    println!("  📏 Dimensions: {}x{} pixels", info.width, info.height);
    println!("  📦 File size: {} ({})", info.size, format_file_size(info.size));
    println!("  🎨 Color type: {:?}", info.color);
    match info.detected_format {
        Some(format) => println!("  🎭 Detected format: {:?}", format),
        None => println!("  🎭 Detected format: unknown"),
    }
    println!("  🔢 Megapixels: {:.2} MP", info.megapixels());
    println!("  💾 Estimated memory usage: {:.2} MB", info.estimated_memory_mb());
    match info.reencode_as {
        Some(format) => println!("  🗜️  Re-encodes as: {} ({})", format, format.mime_type()),
        None => println!("  ⚠️  This format cannot be re-encoded with a quality setting"),
    }

    Ok(info)
}
