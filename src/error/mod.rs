//! # Error Module
//!
//! Error types for the shelver file librarian.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, patterns, what went wrong
//! - **Fatal vs per-file** - only configuration problems abort a run;
//!   anything that happens to a single file is reported as an outcome
//!   and the batch keeps going

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ShelverError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),
}

/// Errors in the configuration, all fatal before any file is touched
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid filter pattern '{pattern}' in content class '{class}': {reason}")]
    InvalidFilter {
        class: String,
        pattern: String,
        reason: String,
    },

    #[error("Content class has an empty name")]
    EmptyClassName,

    #[error("No output folders configured, cannot place any file")]
    NoOutputFolders,

    #[error("Configuration file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("Failed to write configuration file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors while collecting input files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input folder not found: {path}")]
    FolderNotFound { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ShelverError>;
