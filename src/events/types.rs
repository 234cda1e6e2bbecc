//! Event type definitions for progress reporting.

use crate::config::FateAction;
use crate::core::classifier::Classification;
use crate::core::mover::Summary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the sorting pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A run has started
    RunStarted { input_folders: Vec<PathBuf> },
    /// A file is about to be classified
    FileFound { path: PathBuf, index: usize, total: usize },
    /// A file was classified and placed
    FileProcessed {
        classification: Classification,
        summary: Summary,
    },
    /// No criterion matched the file; the unknown-file policy was applied
    FileUnknown { path: PathBuf, action: FateAction },
    /// The file could not be placed; the duplicate or error policy was applied
    FileErrored {
        path: PathBuf,
        action: FateAction,
        cause: String,
    },
    /// A run has finished
    RunFinished { report: RunReport },
}

/// Summary of one full run over the input folders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Total input files seen
    pub total_files: usize,
    /// Files moved or copied to a destination
    pub processed: usize,
    /// Files no criterion matched
    pub unknown: usize,
    /// Files that hit a duplicate destination
    pub duplicates: usize,
    /// Files that failed with an I/O error or had no suitable target
    pub errored: usize,
    /// Duration of the run in milliseconds
    pub duration_ms: u64,
}
