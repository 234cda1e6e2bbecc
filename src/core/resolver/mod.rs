//! Destination resolution for classified files.
//!
//! Given a classification and the configured output targets, works out
//! the concrete destination folder and final file name. TV shows get
//! the full treatment: fuzzy matching against existing show folders,
//! season-folder and file-numbering schemas, and the last-target
//! autocreate fallback. Music files with an album land in an album
//! subfolder of the first suitable target; everything else goes
//! straight to the first suitable target.
//!
//! The resolver only reads the filesystem (directory listings); folder
//! creation is the mover's job so dry-run handling lives in one place.
//! Listings are re-read on every resolution, so a show folder created
//! for one file is found again for the next.

use crate::config::{OutputTarget, TvShowSettings};
use crate::core::classifier::{Classification, MUSIC_CLASS, TVSHOWS_CLASS};
use crate::core::matcher;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A resolved destination: the folder to place the file in and the
/// name it should be given there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub folder: PathBuf,
    pub file_name: String,
}

/// Resolves classifications to concrete destinations.
pub struct DestinationResolver {
    targets: Vec<OutputTarget>,
    settings: TvShowSettings,
    season_tag: Regex,
    episode_tag: Regex,
}

impl DestinationResolver {
    pub fn new(targets: Vec<OutputTarget>, settings: TvShowSettings) -> Self {
        Self {
            targets,
            settings,
            season_tag: tag_regex("season"),
            episode_tag: tag_regex("episode"),
        }
    }

    /// Resolve the destination for one classified file.
    ///
    /// Fills `show_folder_name` on the classification when an existing
    /// show folder matched on disk. Returns `None` when no suitable
    /// output target exists.
    pub fn resolve(&self, classification: &mut Classification) -> Option<Destination> {
        let suitable = self.suitable_targets(&classification.category);
        if suitable.is_empty() {
            debug!(category = %classification.category, "no suitable output target");
            return None;
        }

        if classification.category == TVSHOWS_CLASS {
            return self.resolve_tvshow(classification, &suitable);
        }

        let folder = if classification.category == MUSIC_CLASS
            && !classification.album_name.is_empty()
        {
            suitable[0].path.join(&classification.album_name)
        } else {
            suitable[0].path.clone()
        };

        Some(Destination {
            folder,
            file_name: classification.file_name.clone(),
        })
    }

    /// Output targets for the category, in configured order.
    fn suitable_targets(&self, category: &str) -> Vec<&OutputTarget> {
        self.targets
            .iter()
            .filter(|t| t.contents == category)
            .collect()
    }

    fn resolve_tvshow(
        &self,
        classification: &mut Classification,
        suitable: &[&OutputTarget],
    ) -> Option<Destination> {
        let parent = match self.find_show_parent(classification, suitable) {
            Some(parent) => parent,
            None => {
                // no existing show folder anywhere: the last suitable
                // target is the autocreate target by convention
                let fallback = suitable
                    .iter()
                    .rev()
                    .find(|t| t.auto_create)
                    .or_else(|| suitable.last())?;
                debug!(path = %fallback.path.display(), "using autocreate target for show");
                fallback.path.clone()
            }
        };

        let season_folder = self.apply_season_schema(classification);
        let file_name = self.apply_numbering_schema(classification);

        let show_folder = if classification.show_folder_name.is_empty() {
            matcher::normalize_separators(
                &classification.show_name,
                &self.settings.words_separator_show,
            )
        } else {
            classification.show_folder_name.clone()
        };

        Some(Destination {
            folder: parent.join(show_folder).join(season_folder),
            file_name,
        })
    }

    /// Find the first suitable target that already contains a folder
    /// for this show. The matched folder's exact on-disk name is kept
    /// so a new folder differing only in casing or separators is never
    /// created next to it.
    fn find_show_parent(
        &self,
        classification: &mut Classification,
        suitable: &[&OutputTarget],
    ) -> Option<PathBuf> {
        let pattern = matcher::show_name_pattern(&classification.show_name)?;

        for target in suitable {
            if let Some(existing) = first_matching_subfolder(&target.path, &pattern) {
                debug!(
                    folder = %existing,
                    target = %target.path.display(),
                    "matched existing show folder"
                );
                classification.show_folder_name = existing;
                return Some(target.path.clone());
            }
        }

        None
    }

    fn apply_season_schema(&self, classification: &Classification) -> String {
        replace_tag(
            &self.settings.season_schema,
            &self.season_tag,
            classification.season,
        )
    }

    /// Build the renamed file: normalized show name, the numbering
    /// fragment, and the normalized rest, joined by the file-name word
    /// separator.
    fn apply_numbering_schema(&self, classification: &Classification) -> String {
        let numbering = replace_tag(
            &self.settings.numbering_schema,
            &self.season_tag,
            classification.season,
        );
        let numbering = replace_tag(&numbering, &self.episode_tag, classification.episode);

        let sep = &self.settings.words_separator_file;
        let mut name = format!(
            "{}{}{}",
            matcher::normalize_separators(&classification.show_name, sep),
            sep,
            numbering
        );
        if !classification.show_rest.is_empty() {
            name.push_str(sep);
            name.push_str(&matcher::normalize_separators(&classification.show_rest, sep));
        }

        if classification.extension.is_empty() {
            name
        } else {
            format!("{}.{}", name, classification.extension)
        }
    }
}

/// Compile the substitution pattern for one `{tag:width}` placeholder.
fn tag_regex(tag: &str) -> Regex {
    Regex::new(&format!(r"\{{{}:([0-9]+)\}}", tag)).expect("static tag pattern")
}

/// Replace every `{tag:width}` occurrence with the zero-padded value.
/// A schema without the tag is left untouched.
fn replace_tag(input: &str, tag: &Regex, value: u32) -> String {
    tag.replace_all(input, |caps: &regex::Captures<'_>| {
        let width = caps[1].parse::<usize>().unwrap_or(0);
        format!("{:0width$}", value, width = width)
    })
    .into_owned()
}

/// List the immediate subfolders of `folder` and return the first one
/// (in name order, for determinism) the pattern matches.
fn first_matching_subfolder(folder: &Path, pattern: &Regex) -> Option<String> {
    let entries = fs::read_dir(folder).ok()?;

    let mut names: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    names.into_iter().find(|name| pattern.is_match(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn target(path: &Path, contents: &str) -> OutputTarget {
        OutputTarget {
            path: path.to_path_buf(),
            contents: contents.to_string(),
            auto_create: true,
        }
    }

    fn tvshow_classification() -> Classification {
        Classification {
            category: "tvshows".into(),
            file_name: "A_TV_Show_S02E10_extra.avi".into(),
            base_name: "A_TV_Show_S02E10_extra".into(),
            extension: "avi".into(),
            season: 2,
            episode: 10,
            show_name: "A TV Show".into(),
            show_rest: "extra".into(),
            ..Classification::default()
        }
    }

    #[test]
    fn tag_substitution_pads_to_width() {
        let season = tag_regex("season");
        let episode = tag_regex("episode");

        let result = replace_tag("S{season:2}E{episode:3}", &season, 2);
        let result = replace_tag(&result, &episode, 10);
        assert_eq!(result, "S02E010");
    }

    #[test]
    fn tag_substitution_without_tag_is_a_noop() {
        let episode = tag_regex("episode");
        assert_eq!(replace_tag("Season_{season:2}", &episode, 7), "Season_{season:2}");
    }

    #[test]
    fn resolves_new_show_under_single_target() {
        let tv = TempDir::new().unwrap();
        let resolver = DestinationResolver::new(
            vec![target(tv.path(), "tvshows")],
            TvShowSettings::default(),
        );

        let mut classification = tvshow_classification();
        let destination = resolver.resolve(&mut classification).unwrap();

        assert_eq!(
            destination.folder,
            tv.path().join("A_TV_Show").join("Season_02")
        );
        assert_eq!(destination.file_name, "A_TV_Show_S02E10_extra.avi");
    }

    #[test]
    fn existing_show_folder_is_reused_with_its_exact_name() {
        let tv = TempDir::new().unwrap();
        // folder differs from the show name in casing and separators
        fs::create_dir(tv.path().join("a.tv.show")).unwrap();

        let resolver = DestinationResolver::new(
            vec![target(tv.path(), "tvshows")],
            TvShowSettings::default(),
        );

        let mut classification = tvshow_classification();
        let destination = resolver.resolve(&mut classification).unwrap();

        assert_eq!(classification.show_folder_name, "a.tv.show");
        assert_eq!(
            destination.folder,
            tv.path().join("a.tv.show").join("Season_02")
        );
    }

    #[test]
    fn first_target_with_existing_folder_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::create_dir(first.path().join("A_TV_Show")).unwrap();
        fs::create_dir(second.path().join("A_TV_Show")).unwrap();

        let resolver = DestinationResolver::new(
            vec![target(first.path(), "tvshows"), target(second.path(), "tvshows")],
            TvShowSettings::default(),
        );

        let mut classification = tvshow_classification();
        let destination = resolver.resolve(&mut classification).unwrap();
        assert!(destination.folder.starts_with(first.path()));
    }

    #[test]
    fn fallback_uses_last_suitable_target() {
        let first = TempDir::new().unwrap();
        let last = TempDir::new().unwrap();

        let resolver = DestinationResolver::new(
            vec![target(first.path(), "tvshows"), target(last.path(), "tvshows")],
            TvShowSettings::default(),
        );

        let mut classification = tvshow_classification();
        let destination = resolver.resolve(&mut classification).unwrap();

        // no existing show folder anywhere: the last target autocreates
        assert!(destination.folder.starts_with(last.path()));
    }

    #[test]
    fn fallback_skips_targets_with_autocreate_disabled() {
        let first = TempDir::new().unwrap();
        let last = TempDir::new().unwrap();

        let mut no_create = target(last.path(), "tvshows");
        no_create.auto_create = false;

        let resolver = DestinationResolver::new(
            vec![target(first.path(), "tvshows"), no_create],
            TvShowSettings::default(),
        );

        let mut classification = tvshow_classification();
        let destination = resolver.resolve(&mut classification).unwrap();
        assert!(destination.folder.starts_with(first.path()));
    }

    #[test]
    fn custom_schemas_shape_folder_and_file() {
        let tv = TempDir::new().unwrap();
        let settings = TvShowSettings {
            numbering_schema: "S={season:1}E={episode:3}".into(),
            season_schema: "The.season.{season:3}".into(),
            ..TvShowSettings::default()
        };
        let resolver = DestinationResolver::new(vec![target(tv.path(), "tvshows")], settings);

        let mut classification = tvshow_classification();
        let destination = resolver.resolve(&mut classification).unwrap();

        assert_eq!(
            destination.folder,
            tv.path().join("A_TV_Show").join("The.season.002")
        );
        assert_eq!(destination.file_name, "A_TV_Show_S=2E=010_extra.avi");
    }

    #[test]
    fn music_with_album_gets_album_subfolder_of_first_target() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let resolver = DestinationResolver::new(
            vec![target(first.path(), "music"), target(second.path(), "music")],
            TvShowSettings::default(),
        );

        let mut classification = Classification {
            category: "music".into(),
            file_name: "track.mp3".into(),
            album_name: "Best Album".into(),
            ..Classification::default()
        };

        let destination = resolver.resolve(&mut classification).unwrap();
        assert_eq!(destination.folder, first.path().join("Best Album"));
        assert_eq!(destination.file_name, "track.mp3");
    }

    #[test]
    fn music_without_album_is_a_regular_file() {
        let music = TempDir::new().unwrap();
        let resolver = DestinationResolver::new(
            vec![target(music.path(), "music")],
            TvShowSettings::default(),
        );

        let mut classification = Classification {
            category: "music".into(),
            file_name: "track.mp3".into(),
            ..Classification::default()
        };

        let destination = resolver.resolve(&mut classification).unwrap();
        assert_eq!(destination.folder, music.path());
    }

    #[test]
    fn other_categories_use_first_suitable_target() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let resolver = DestinationResolver::new(
            vec![target(first.path(), "videos"), target(second.path(), "videos")],
            TvShowSettings::default(),
        );

        let mut classification = Classification {
            category: "videos".into(),
            file_name: "movie.mkv".into(),
            ..Classification::default()
        };

        let destination = resolver.resolve(&mut classification).unwrap();
        assert_eq!(destination.folder, first.path());
    }

    #[test]
    fn no_suitable_target_is_unresolved() {
        let resolver = DestinationResolver::new(vec![], TvShowSettings::default());

        let mut classification = Classification {
            category: "videos".into(),
            file_name: "movie.mkv".into(),
            ..Classification::default()
        };

        assert!(resolver.resolve(&mut classification).is_none());
    }
}
