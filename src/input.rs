use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use crate::error::{CompressionError, Result};
use crate::pipeline::{AdmissionLimit, ImageItem};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Expands a list of inputs into image file paths, keeping the given order.
///
/// Each input may be a file, a directory (searched one level deep unless
/// `recursive`), or a glob pattern. Directory and glob matches are sorted by
/// path so that batch order is reproducible. Explicitly named files are
/// accepted whatever their extension; the codec decides whether they decode.
pub fn collect_image_files(inputs: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    for input in inputs {
        let input_path = Path::new(input);

        if input_path.is_file() {
            image_files.push(input_path.to_path_buf());
        } else if input_path.is_dir() {
            let walker = if recursive {
                WalkDir::new(input_path).sort_by_file_name()
            } else {
                WalkDir::new(input_path).max_depth(1).sort_by_file_name()
            };

            for entry in walker
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
            {
                let entry = entry?;
                if entry.file_type().is_file() && is_image_file(entry.path()) {
                    image_files.push(entry.into_path());
                }
            }
        } else if let Ok(pattern) = glob(input) {
            let mut matches: Vec<PathBuf> = pattern
                .flatten()
                .filter(|path| path.is_file() && is_image_file(path))
                .collect();
            if matches.is_empty() {
                return Err(CompressionError::NoImageFilesFound(input.clone()));
            }
            matches.sort();
            image_files.extend(matches);
        } else {
            return Err(CompressionError::FileNotFound(input_path.to_path_buf()));
        }
    }

    debug!(count = image_files.len(), "collected input files");
    Ok(image_files)
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Admission check from file metadata, before any file is read into memory.
///
/// # Returns
/// * `Ok(total_bytes)` - Summed size of all files
/// * `Err(CompressionError::AdmissionLimitExceeded)` - If the files would not be admitted
pub fn preflight(paths: &[PathBuf], limit: AdmissionLimit) -> Result<u64> {
    let mut total = 0u64;
    for path in paths {
        total += fs::metadata(path)?.len();
    }
    limit.check(total)?;
    Ok(total)
}

/// Reads files into batch items named after their file name.
pub fn read_items(paths: &[PathBuf]) -> Result<Vec<ImageItem>> {
    paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| CompressionError::FileNotFound(path.clone()))?;
            Ok(ImageItem::new(name, fs::read(path)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(path: &Path, contents: &[u8]) {
        File::create(path).unwrap().write_all(contents).unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("test.jpg")));
        assert!(is_image_file(Path::new("test.JPEG")));
        assert!(is_image_file(Path::new("test.png")));
        assert!(is_image_file(Path::new("test.webp")));

        assert!(!is_image_file(Path::new("test.gif")));
        assert!(!is_image_file(Path::new("test.txt")));
        assert!(!is_image_file(Path::new("test")));
    }

    #[test]
    fn test_collect_keeps_explicit_order() {
        let temp_dir = TempDir::new().unwrap();
        let b = temp_dir.path().join("b.jpg");
        let a = temp_dir.path().join("a.png");
        touch(&b, b"b");
        touch(&a, b"a");

        let inputs = vec![b.to_string_lossy().into_owned(), a.to_string_lossy().into_owned()];
        let files = collect_image_files(&inputs, false).unwrap();

        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn test_collect_directory_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("z.jpg"), b"z");
        touch(&temp_dir.path().join("a.webp"), b"a");
        touch(&temp_dir.path().join("notes.txt"), b"n");
        touch(&temp_dir.path().join(".hidden.png"), b"h");

        let inputs = vec![temp_dir.path().to_string_lossy().into_owned()];
        let files = collect_image_files(&inputs, false).unwrap();

        assert_eq!(names(&files), vec!["a.webp", "z.jpg"]);
    }

    #[test]
    fn test_collect_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        touch(&temp_dir.path().join("top.jpg"), b"t");
        touch(&subdir.join("nested.png"), b"n");

        let inputs = vec![temp_dir.path().to_string_lossy().into_owned()];

        let shallow = collect_image_files(&inputs, false).unwrap();
        assert_eq!(names(&shallow), vec!["top.jpg"]);

        let deep = collect_image_files(&inputs, true).unwrap();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_collect_glob_pattern() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("test1.jpg"), b"1");
        touch(&temp_dir.path().join("test2.png"), b"2");

        let pattern = format!("{}/*.jpg", temp_dir.path().to_string_lossy());
        let files = collect_image_files(&[pattern], false).unwrap();

        assert_eq!(names(&files), vec!["test1.jpg"]);
    }

    #[test]
    fn test_collect_unmatched_glob() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.png", temp_dir.path().to_string_lossy());

        let result = collect_image_files(&[pattern], false);

        assert!(matches!(result, Err(CompressionError::NoImageFilesFound(_))));
    }

    #[test]
    fn test_preflight() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.jpg");
        let b = temp_dir.path().join("b.jpg");
        touch(&a, &[0u8; 600]);
        touch(&b, &[0u8; 500]);
        let paths = vec![a, b];

        assert_eq!(preflight(&paths, AdmissionLimit::from_bytes(1100)).unwrap(), 1100);
        assert!(matches!(
            preflight(&paths, AdmissionLimit::from_bytes(1099)),
            Err(CompressionError::AdmissionLimitExceeded {
                total: 1100,
                limit: 1099
            })
        ));
    }

    #[test]
    fn test_read_items() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("photo.jpg");
        touch(&path, b"payload");

        let items = read_items(&[path]).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name(), "photo.jpg");
        assert_eq!(items[0].data(), b"payload");
    }
}
