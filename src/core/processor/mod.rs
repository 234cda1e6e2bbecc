//! Run orchestration.
//!
//! Wires the pipeline together: scan the input folders, classify each
//! file, resolve its destination and place it, applying the configured
//! fate policies to everything that cannot be placed. Emits events for
//! every step so a UI can follow along, and returns a report with the
//! run's counters.
//!
//! Per-file failures never abort the run; the file is counted, its
//! policy applied, and the batch continues.

use crate::config::Config;
use crate::core::classifier::{Classifier, Criteria};
use crate::core::mover::{FileOrganizer, PlacementAction};
use crate::core::resolver::DestinationResolver;
use crate::core::scanner::InputScanner;
use crate::error::{ConfigError, Result};
use crate::events::{null_sender, Event, EventSender, RunReport};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// One full pass over the configured input folders.
pub struct Processor {
    config: Config,
    dry_run: bool,
    copy_only: bool,
}

impl Processor {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dry_run: false,
            copy_only: false,
        }
    }

    /// Compute and report everything, change nothing on disk.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Copy files to their destinations instead of moving them.
    pub fn copy_only(mut self, copy_only: bool) -> Self {
        self.copy_only = copy_only;
        self
    }

    /// Run without event reporting.
    pub fn run(&self) -> Result<RunReport> {
        self.run_with_events(&null_sender())
    }

    /// Run the full pass, emitting events along the way.
    ///
    /// # Errors
    ///
    /// Fails before touching any file when no output folders are
    /// configured or a filter pattern does not compile. Everything
    /// after that is per-file and lands in the report instead.
    pub fn run_with_events(&self, events: &EventSender) -> Result<RunReport> {
        if self.config.output_folders.is_empty() {
            return Err(ConfigError::NoOutputFolders.into());
        }

        let criteria = Criteria::from_config(&self.config.content_classes)?;
        let classifier = Classifier::new(criteria);
        let resolver = DestinationResolver::new(
            self.config.output_folders.clone(),
            self.config.tvshows.clone(),
        );
        let organizer = FileOrganizer::new(self.dry_run, self.copy_only);

        let start = Instant::now();
        events.send(Event::RunStarted {
            input_folders: self.config.input_folders.clone(),
        });

        let batches = self.collect_input_files();
        let total: usize = batches.iter().map(|(_, files)| files.len()).sum();
        let mut report = RunReport {
            total_files: total,
            ..RunReport::default()
        };

        let mut index = 0;
        for (base_folder, files) in &batches {
            for file in files {
                index += 1;
                events.send(Event::FileFound {
                    path: file.clone(),
                    index,
                    total,
                });

                self.process_file(file, base_folder, &classifier, &resolver, &organizer, events, &mut report);
            }

            if !self.dry_run {
                InputScanner::prune_empty_subfolders(base_folder);
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            total = report.total_files,
            processed = report.processed,
            unknown = report.unknown,
            duplicates = report.duplicates,
            errored = report.errored,
            "run finished"
        );
        events.send(Event::RunFinished {
            report: report.clone(),
        });

        Ok(report)
    }

    /// Scan every configured input folder. A missing folder is logged
    /// and skipped rather than failing the run.
    fn collect_input_files(&self) -> Vec<(PathBuf, Vec<PathBuf>)> {
        let mut batches = Vec::new();
        for folder in &self.config.input_folders {
            match InputScanner::scan(folder) {
                Ok(files) => batches.push((folder.clone(), files)),
                Err(e) => warn!(folder = %folder.display(), error = %e, "skipping input folder"),
            }
        }
        batches
    }

    #[allow(clippy::too_many_arguments)]
    fn process_file(
        &self,
        file: &Path,
        base_folder: &Path,
        classifier: &Classifier,
        resolver: &DestinationResolver,
        organizer: &FileOrganizer,
        events: &EventSender,
        report: &mut RunReport,
    ) {
        let mut classification = classifier.classify(file, base_folder);

        if !classification.is_classified() {
            report.unknown += 1;
            self.apply_policy(file, organizer, &self.config.unknown_files);
            events.send(Event::FileUnknown {
                path: file.to_path_buf(),
                action: self.config.unknown_files.action,
            });
            return;
        }

        let Some(destination) = resolver.resolve(&mut classification) else {
            report.errored += 1;
            self.apply_policy(file, organizer, &self.config.error_files);
            events.send(Event::FileErrored {
                path: file.to_path_buf(),
                action: self.config.error_files.action,
                cause: format!("no output folder accepts '{}'", classification.category),
            });
            return;
        };

        match organizer.place(file, &destination) {
            Ok(summary) => {
                match summary.action {
                    PlacementAction::Duplicate => {
                        report.duplicates += 1;
                        self.apply_policy(file, organizer, &self.config.duplicate_files);
                    }
                    PlacementAction::Moved | PlacementAction::Copied => report.processed += 1,
                }
                events.send(Event::FileProcessed {
                    classification,
                    summary,
                });
            }
            Err(e) => {
                report.errored += 1;
                self.apply_policy(file, organizer, &self.config.error_files);
                events.send(Event::FileErrored {
                    path: file.to_path_buf(),
                    action: self.config.error_files.action,
                    cause: e.to_string(),
                });
            }
        }
    }

    /// Policy failures are logged, never fatal.
    fn apply_policy(
        &self,
        file: &Path,
        organizer: &FileOrganizer,
        policy: &crate::config::FilePolicy,
    ) {
        if let Err(e) = organizer.apply_policy(file, policy) {
            warn!(file = %file.display(), error = %e, "fate policy failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContentClass, FateAction, FilePolicy, OutputTarget};
    use crate::error::ShelverError;
    use std::fs;
    use tempfile::TempDir;

    fn base_config(watch: &Path, library: &Path) -> Config {
        Config {
            input_folders: vec![watch.to_path_buf()],
            output_folders: vec![
                OutputTarget {
                    path: library.join("tv"),
                    contents: "tvshows".into(),
                    auto_create: true,
                },
                OutputTarget {
                    path: library.join("music"),
                    contents: "music".into(),
                    auto_create: true,
                },
            ],
            content_classes: vec![
                ContentClass {
                    name: "tvshows".into(),
                    extensions: vec!["avi".into(), "mkv".into()],
                    filters: vec![
                        "(?<name>.+)S(?<season>[0-9]{1,3})E(?<episode>[0-9]{1,3})(?<rest>.*)"
                            .into(),
                    ],
                },
                ContentClass {
                    name: "music".into(),
                    extensions: vec!["mp3".into()],
                    filters: vec![],
                },
            ],
            ..Config::default()
        }
    }

    #[test]
    fn run_without_output_folders_is_fatal() {
        let watch = TempDir::new().unwrap();
        let config = Config {
            input_folders: vec![watch.path().to_path_buf()],
            ..Config::default()
        };

        let result = Processor::new(config).run();
        assert!(matches!(
            result,
            Err(ShelverError::Config(ConfigError::NoOutputFolders))
        ));
    }

    #[test]
    fn tv_file_lands_in_show_and_season_folder() {
        let watch = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        fs::write(watch.path().join("A_TV_Show_S02E10_extra.avi"), b"x").unwrap();
        fs::create_dir_all(library.path().join("tv")).unwrap();

        let report = Processor::new(base_config(watch.path(), library.path()))
            .run()
            .unwrap();

        assert_eq!(report.processed, 1);
        assert!(library
            .path()
            .join("tv/A_TV_Show/Season_02/A_TV_Show_S02E10_extra.avi")
            .exists());
        assert!(!watch.path().join("A_TV_Show_S02E10_extra.avi").exists());
    }

    #[test]
    fn album_subfolder_is_recreated_and_pruned() {
        let watch = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        fs::create_dir(watch.path().join("Best Album")).unwrap();
        fs::write(watch.path().join("Best Album/track.mp3"), b"x").unwrap();
        fs::create_dir_all(library.path().join("music")).unwrap();

        let report = Processor::new(base_config(watch.path(), library.path()))
            .run()
            .unwrap();

        assert_eq!(report.processed, 1);
        assert!(library.path().join("music/Best Album/track.mp3").exists());
        // emptied album folder is pruned from the watch folder
        assert!(!watch.path().join("Best Album").exists());
    }

    #[test]
    fn unknown_file_gets_its_policy_applied_once() {
        let watch = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        fs::write(watch.path().join("mystery.xyz"), b"x").unwrap();

        let mut config = base_config(watch.path(), library.path());
        config.unknown_files = FilePolicy {
            action: FateAction::Delete,
            move_path: None,
        };

        let report = Processor::new(config).run().unwrap();

        assert_eq!(report.unknown, 1);
        assert_eq!(report.processed, 0);
        assert!(!watch.path().join("mystery.xyz").exists());
    }

    #[test]
    fn hidden_file_is_unknown_and_gets_the_policy() {
        let watch = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        fs::write(watch.path().join(".DS_Store"), b"x").unwrap();

        let mut config = base_config(watch.path(), library.path());
        config.unknown_files = FilePolicy {
            action: FateAction::Delete,
            move_path: None,
        };

        let report = Processor::new(config).run().unwrap();

        assert_eq!(report.total_files, 1);
        assert_eq!(report.unknown, 1);
        assert!(!watch.path().join(".DS_Store").exists());
    }

    #[test]
    fn second_run_reports_a_duplicate() {
        let watch = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        fs::create_dir_all(library.path().join("tv")).unwrap();
        let config = base_config(watch.path(), library.path());

        fs::write(watch.path().join("A_TV_Show_S02E10.avi"), b"first").unwrap();
        Processor::new(config.clone()).run().unwrap();

        fs::write(watch.path().join("A_TV_Show_S02E10.avi"), b"second").unwrap();
        let report = Processor::new(config).run().unwrap();

        assert_eq!(report.duplicates, 1);
        assert_eq!(report.processed, 0);
        // first arrival is untouched
        assert_eq!(
            fs::read(
                library
                    .path()
                    .join("tv/A_TV_Show/Season_02/A_TV_Show_S02E10.avi")
            )
            .unwrap(),
            b"first"
        );
    }

    #[test]
    fn dry_run_changes_nothing() {
        let watch = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        fs::write(watch.path().join("A_TV_Show_S02E10.avi"), b"x").unwrap();
        fs::create_dir_all(library.path().join("tv")).unwrap();

        let report = Processor::new(base_config(watch.path(), library.path()))
            .dry_run(true)
            .run()
            .unwrap();

        assert_eq!(report.processed, 1);
        assert!(watch.path().join("A_TV_Show_S02E10.avi").exists());
        assert!(!library.path().join("tv/A_TV_Show").exists());
    }

    #[test]
    fn unresolved_category_counts_as_errored() {
        let watch = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        fs::write(watch.path().join("clip.webm"), b"x").unwrap();

        let mut config = base_config(watch.path(), library.path());
        // a class with no matching output target
        config.content_classes.push(ContentClass {
            name: "webvideos".into(),
            extensions: vec!["webm".into()],
            filters: vec![],
        });

        let report = Processor::new(config).run().unwrap();

        assert_eq!(report.errored, 1);
        assert!(watch.path().join("clip.webm").exists());
    }

    #[test]
    fn events_follow_the_run() {
        let watch = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        fs::write(watch.path().join("A_TV_Show_S02E10.avi"), b"x").unwrap();
        fs::create_dir_all(library.path().join("tv")).unwrap();

        let (sender, receiver) = crate::events::EventChannel::new();
        Processor::new(base_config(watch.path(), library.path()))
            .run_with_events(&sender)
            .unwrap();
        drop(sender);

        let events: Vec<Event> = receiver.iter().collect();
        assert!(matches!(events.first(), Some(Event::RunStarted { .. })));
        assert!(matches!(events.last(), Some(Event::RunFinished { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::FileProcessed { .. })));
    }
}
