//! File placement: the final step of the pipeline.
//!
//! Takes a resolved destination and physically puts the file there,
//! creating missing folders on the way. A destination that already
//! exists is never overwritten; the file is reported as a duplicate and
//! the configured duplicate policy decides its fate. Unknown and errored
//! files get their own policies.
//!
//! In dry-run mode every operation is computed and reported but nothing
//! on disk changes.

use crate::config::{FateAction, FilePolicy};
use crate::core::resolver::Destination;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What happened to a placed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementAction {
    /// Moved to the destination
    Moved,
    /// Copied to the destination, source left in place
    Copied,
    /// Destination already existed, source left untouched
    Duplicate,
}

impl std::fmt::Display for PlacementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementAction::Moved => write!(f, "moved"),
            PlacementAction::Copied => write!(f, "copied"),
            PlacementAction::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// Record of one placement, emitted with the `FileProcessed` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub input_folder: PathBuf,
    pub input_file_name: String,
    pub output_folder: PathBuf,
    pub output_file_name: String,
    pub action: PlacementAction,
}

/// Places files at their resolved destinations and applies fate
/// policies to the ones that could not be placed.
pub struct FileOrganizer {
    dry_run: bool,
    copy_only: bool,
}

impl FileOrganizer {
    pub fn new(dry_run: bool, copy_only: bool) -> Self {
        Self { dry_run, copy_only }
    }

    /// Put `source` at its resolved destination.
    ///
    /// An existing destination file is left alone and reported as a
    /// duplicate; the source stays where it is so the duplicate policy
    /// can deal with it.
    pub fn place(&self, source: &Path, destination: &Destination) -> io::Result<Summary> {
        let target = destination.folder.join(&destination.file_name);

        let summary = |action| Summary {
            input_folder: source.parent().unwrap_or(Path::new("")).to_path_buf(),
            input_file_name: source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            output_folder: destination.folder.clone(),
            output_file_name: destination.file_name.clone(),
            action,
        };

        if target.exists() {
            debug!(target = %target.display(), "destination already exists");
            return Ok(summary(PlacementAction::Duplicate));
        }

        if self.dry_run {
            debug!(
                source = %source.display(),
                target = %target.display(),
                "dry run, skipping transfer"
            );
        } else {
            fs::create_dir_all(&destination.folder)?;
            if self.copy_only {
                fs::copy(source, &target)?;
            } else {
                move_file(source, &target)?;
            }
        }

        Ok(summary(if self.copy_only {
            PlacementAction::Copied
        } else {
            PlacementAction::Moved
        }))
    }

    /// Apply a fate policy to a file that was not placed.
    ///
    /// `move` quarantines the file under the policy's `move_path`,
    /// suffixing the name with a timestamp when it collides with an
    /// earlier arrival.
    pub fn apply_policy(&self, file: &Path, policy: &FilePolicy) -> io::Result<()> {
        if self.dry_run {
            debug!(file = %file.display(), action = %policy.action, "dry run, skipping policy");
            return Ok(());
        }

        match policy.action {
            FateAction::Ignore => Ok(()),
            FateAction::Delete => {
                debug!(file = %file.display(), "deleting per policy");
                fs::remove_file(file)
            }
            FateAction::Move => {
                let Some(quarantine) = &policy.move_path else {
                    warn!(file = %file.display(), "move policy without move_path, ignoring file");
                    return Ok(());
                };
                self.quarantine(file, quarantine)
            }
        }
    }

    fn quarantine(&self, file: &Path, quarantine: &Path) -> io::Result<()> {
        fs::create_dir_all(quarantine)?;

        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut target = quarantine.join(&name);
        if target.exists() {
            let stamped = format!("{}-{}", name, chrono::Utc::now().timestamp_millis());
            target = quarantine.join(stamped);
        }

        debug!(file = %file.display(), target = %target.display(), "quarantining per policy");
        move_file(file, &target)
    }
}

/// Rename, falling back to copy-and-delete across filesystems.
///
/// The copy is size-verified before the source is removed; a short copy
/// is rolled back and reported as an error.
fn move_file(source: &Path, target: &Path) -> io::Result<()> {
    fs::rename(source, target).or_else(|_| {
        let source_size = fs::metadata(source)?.len();
        if let Err(e) = fs::copy(source, target) {
            // a failed copy may leave a partial destination behind
            let _ = fs::remove_file(target);
            return Err(e);
        }

        let target_size = fs::metadata(target)?.len();
        if target_size != source_size {
            let _ = fs::remove_file(target);
            return Err(io::Error::other(format!(
                "copy verification failed: source {} bytes, destination {} bytes",
                source_size, target_size
            )));
        }

        fs::remove_file(source)
    })
}
