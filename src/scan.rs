//! Picture discovery.
//!
//! Walks every input directory recursively and collects the files whose
//! extension names a decodable picture format (`.jpg`, `.jpeg`, `.png`,
//! case-insensitive). Nothing is opened or decoded here.
//!
//! ## Ordering
//!
//! Entries are visited in file-name order within each directory and input
//! directories are visited in the order given, so the discovered list is
//! identical from run to run. Seeded layouts rely on that.
//!
//! ## Validation
//!
//! - Every input path must be an existing directory.
//! - Unreadable entries below an input directory are skipped with a warning.
//! - A file reachable from two overlapping inputs is listed once.

use crate::imaging::supported_input_extensions;
use crate::types::SourcePicture;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input directory not found: {0}")]
    MissingDirectory(PathBuf),
}

/// Collect candidate pictures below each of `folders`.
#[tracing::instrument(skip_all, fields(folders = folders.len()))]
pub fn discover(folders: &[PathBuf]) -> Result<Vec<SourcePicture>, ScanError> {
    for folder in folders {
        if !folder.is_dir() {
            return Err(ScanError::MissingDirectory(folder.clone()));
        }
    }

    let mut seen = HashSet::new();
    let mut pictures = Vec::new();

    for folder in folders {
        let walker = WalkDir::new(folder)
            .follow_links(false)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_picture(entry.path()) {
                continue;
            }
            let path = entry.into_path();
            if seen.insert(path.clone()) {
                pictures.push(SourcePicture::new(path));
            }
        }
    }

    tracing::debug!(count = pictures.len(), "discovery finished");
    Ok(pictures)
}

fn is_picture(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    supported_input_extensions().contains(&ext.as_str())
}
