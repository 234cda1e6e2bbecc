//! Input folder scanning.
//!
//! Walks each watched folder depth-first and returns the files found,
//! deepest first, in deterministic name order. Subfolders left empty
//! after a run (an album whose tracks all moved out) are pruned so the
//! watched folders do not silt up with husks.

use crate::error::ScanError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Scans watched input folders.
pub struct InputScanner;

impl InputScanner {
    /// Collect every file under `folder`, depth-first.
    ///
    /// Files in deeper subfolders come before files at the root, and
    /// entries at the same depth are sorted by name so runs are
    /// reproducible. Hidden files are collected like any other; no
    /// rule matches them, so the unknown-file policy decides their
    /// fate.
    ///
    /// # Errors
    ///
    /// Fails when the folder does not exist or is not a directory.
    pub fn scan(folder: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !folder.is_dir() {
            return Err(ScanError::FolderNotFound {
                path: folder.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(folder)
            .contents_first(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| ScanError::ReadDirectory {
                path: e.path().map(Path::to_path_buf).unwrap_or_default(),
                source: e.into(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            files.push(entry.into_path());
        }

        debug!(folder = %folder.display(), count = files.len(), "scanned input folder");
        Ok(files)
    }

    /// Remove subfolders of `folder` that contain no files, deepest
    /// first. The folder itself is never removed.
    pub fn prune_empty_subfolders(folder: &Path) {
        let walker = WalkDir::new(folder)
            .min_depth(1)
            .contents_first(true)
            .sort_by_file_name();

        for entry in walker.into_iter().flatten() {
            if !entry.file_type().is_dir() {
                continue;
            }

            // remove_dir refuses non-empty folders, so this is safe to
            // attempt on every subfolder
            if fs::remove_dir(entry.path()).is_ok() {
                debug!(folder = %entry.path().display(), "removed empty subfolder");
            }
        }
    }
}
