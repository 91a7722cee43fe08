//! ZIP assembly for multi-image batches.
//!
//! Entries are deflate-compressed and written in the order given. Duplicate
//! entry names follow a last-write-wins policy: only the final payload for a
//! name is kept, at the position of that final occurrence.

use crate::error::Result;
use std::collections::HashMap;
use std::io::{Cursor, Seek, Write};
use tracing::{debug, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One named payload destined for the archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveEntry<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
}

fn archive_options() -> FileOptions {
    FileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Writes `entries` into a ZIP archive on `sink` and returns the sink.
pub fn write_archive<'a, W, I>(entries: I, sink: W) -> Result<W>
where
    W: Write + Seek,
    I: IntoIterator<Item = ArchiveEntry<'a>>,
{
    let mut zip = ZipWriter::new(sink);
    let options = archive_options();

    for entry in last_write_wins(entries.into_iter().collect()) {
        debug!(name = entry.name, bytes = entry.data.len(), "adding archive entry");
        zip.start_file(entry.name, options)?;
        zip.write_all(entry.data)?;
    }

    Ok(zip.finish()?)
}

/// Builds the archive in memory.
pub fn build_archive<'a, I>(entries: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = ArchiveEntry<'a>>,
{
    Ok(write_archive(entries, Cursor::new(Vec::new()))?.into_inner())
}

fn last_write_wins(entries: Vec<ArchiveEntry<'_>>) -> Vec<ArchiveEntry<'_>> {
    let mut last_index: HashMap<&str, usize> = HashMap::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if let Some(previous) = last_index.insert(entry.name, index) {
            warn!(
                name = entry.name,
                replaced = previous,
                by = index,
                "duplicate archive entry name, keeping the later payload"
            );
        }
    }

    entries
        .into_iter()
        .enumerate()
        .filter(|(index, entry)| last_index.get(entry.name) == Some(index))
        .map(|(_, entry)| entry)
        .collect()
}
