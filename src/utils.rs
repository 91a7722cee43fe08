//! Size reporting helpers shared by the pipeline summary and the CLI.

use crate::constants::BYTES_PER_KB;

/// Format a byte count in KB with one decimal, the unit batch summaries use
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / BYTES_PER_KB as f64)
}

/// Format file size in human-readable format
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Percentage of space saved, `(1 - compressed / original) * 100`.
///
/// Negative when the output grew. `None` when there is nothing to compare
/// against (`original_size == 0`).
pub fn space_saved_percent(original_size: u64, compressed_size: u64) -> Option<f64> {
    if original_size == 0 {
        return None;
    }
    Some((original_size as f64 - compressed_size as f64) / original_size as f64 * 100.0)
}

/// Render a space-saved value for display, `n/a` when it does not apply
pub fn format_space_saved(saved: Option<f64>) -> String {
    match saved {
        Some(percent) => format!("{:.1}%", percent),
        None => "n/a".to_string(),
    }
}
