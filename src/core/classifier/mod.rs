//! File classification against the ordered criteria.
//!
//! TV show rules are tried first, in configured order; the first filter
//! that captures a show name wins. All remaining criteria are then tried
//! in order, matching on extension membership *or* any filter regex.
//! There is no scoring - the first satisfying rule wins at each stage.

mod types;

pub use types::{Classification, Criteria, Criterion, MUSIC_CLASS, TVSHOWS_CLASS};

use crate::core::matcher;
use std::path::Path;

/// Classifies files based on the configured criteria.
pub struct Classifier {
    criteria: Criteria,
}

impl Classifier {
    pub fn new(criteria: Criteria) -> Self {
        Self { criteria }
    }

    /// Classify one file.
    ///
    /// `base_folder` is the watched root the file was found under; a
    /// music file whose immediate parent differs from it is assumed to
    /// sit in an album folder.
    pub fn classify(&self, file_path: &Path, base_folder: &Path) -> Classification {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // TV show rules first
        for criterion in self.criteria.iter().filter(|c| c.is_tvshow()) {
            let classification = match_tvshow(&file_name, criterion);
            if !classification.show_name.is_empty() {
                return classification;
            }
        }

        // then everything else
        for criterion in self.criteria.iter().filter(|c| !c.is_tvshow()) {
            let mut classification = match_other(&file_name, criterion);
            if !classification.is_classified() {
                continue;
            }

            if classification.category == MUSIC_CLASS {
                // a music file below the watched root is assumed to be
                // part of an album folder
                if let Some(parent) = file_path.parent() {
                    if parent != base_folder {
                        if let Some(album) = parent.file_name() {
                            classification.album_name = album.to_string_lossy().into_owned();
                        }
                    }
                }
            }

            return classification;
        }

        Classification::default()
    }
}

/// Try to match a filename against a TV show criterion.
///
/// Returns an empty classification when the criterion does not apply.
fn match_tvshow(file_name: &str, criterion: &Criterion) -> Classification {
    let (base_name, extension) = matcher::split_extension(file_name);

    // extension gate first, when declared
    if !criterion.extensions.is_empty() && !criterion.extensions.iter().any(|e| e == extension) {
        return Classification::default();
    }

    for filter in &criterion.filters {
        let Some(groups) = matcher::match_named_groups(base_name, filter) else {
            continue;
        };

        let mut classification = Classification {
            category: criterion.name.clone(),
            file_name: file_name.to_string(),
            base_name: base_name.to_string(),
            extension: extension.to_string(),
            ..Classification::default()
        };

        if let Some(name) = groups.get("name") {
            classification.show_name = matcher::capture_to_words(name);
        }

        // absent or unparseable numbers keep the default 0
        classification.season = parse_group(&groups, "season");
        classification.episode = parse_group(&groups, "episode");

        if let Some(rest) = groups.get("rest") {
            classification.show_rest = matcher::capture_to_words(rest);
        }

        return classification;
    }

    Classification::default()
}

/// Try to match a filename against a non-TV criterion.
///
/// Extension membership and filter match are alternatives: one of the
/// two suffices.
fn match_other(file_name: &str, criterion: &Criterion) -> Classification {
    let (base_name, extension) = matcher::split_extension(file_name);

    let extension_matches = !criterion.extensions.is_empty()
        && criterion.extensions.iter().any(|e| e == extension);

    let filter_matches = criterion.filters.iter().any(|f| f.is_match(base_name));

    if !(extension_matches || filter_matches) {
        return Classification::default();
    }

    Classification {
        category: criterion.name.clone(),
        file_name: file_name.to_string(),
        base_name: base_name.to_string(),
        extension: extension.to_string(),
        ..Classification::default()
    }
}

fn parse_group(groups: &std::collections::HashMap<String, String>, name: &str) -> u32 {
    groups
        .get(name)
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}
