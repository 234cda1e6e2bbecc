//! # Configuration Module
//!
//! Typed configuration for the file librarian, loaded from TOML.
//!
//! The configuration describes which files belong to which content class
//! (ordered regex criteria), where each class should be shelved (output
//! targets), how TV show folders and files are renamed, and what to do
//! with files that cannot be placed.
//!
//! Everything is plain serde-derived structs populated once at load time;
//! the core never performs stringly-typed key lookups.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default schema applied to TV show file names.
pub const DEFAULT_NUMBERING_SCHEMA: &str = "S{season:2}E{episode:2}";
/// Default schema applied to season folder names.
pub const DEFAULT_SEASON_SCHEMA: &str = "Season_{season:2}";
/// Default word separator for show folder names.
pub const DEFAULT_WORDS_SEPARATOR_SHOW: &str = "_";
/// Default word separator for renamed file names.
pub const DEFAULT_WORDS_SEPARATOR_FILE: &str = "_";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Watched folders whose contents get sorted
    #[serde(default)]
    pub input_folders: Vec<PathBuf>,

    /// Destination roots, one per content category, in priority order
    #[serde(default)]
    pub output_folders: Vec<OutputTarget>,

    /// Ordered classification rules
    #[serde(default)]
    pub content_classes: Vec<ContentClass>,

    /// TV show renaming settings
    #[serde(default)]
    pub tvshows: TvShowSettings,

    /// What to do with files no criterion matches
    #[serde(default)]
    pub unknown_files: FilePolicy,

    /// What to do with files whose destination already exists
    #[serde(default)]
    pub duplicate_files: FilePolicy,

    /// What to do with files that failed to move or copy
    #[serde(default)]
    pub error_files: FilePolicy,
}

/// One configured destination root tied to a content category.
///
/// Multiple targets may share a category; they are considered in
/// configuration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputTarget {
    /// Destination root path
    pub path: PathBuf,
    /// Content category this target accepts
    pub contents: String,
    /// Whether new show folders may be created under this target
    #[serde(default = "default_true")]
    pub auto_create: bool,
}

/// A named classification rule: allowed extensions and/or filter regexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentClass {
    /// Category name; `tvshows` and `music` get special treatment
    pub name: String,
    /// Extensions (without the dot) this class accepts
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Filter regexes tried in order against the extension-stripped name
    #[serde(default)]
    pub filters: Vec<String>,
}

/// Renaming settings for TV show files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TvShowSettings {
    /// Template for the season-and-episode fragment of the file name
    pub numbering_schema: String,
    /// Template for the season folder name
    pub season_schema: String,
    /// Word separator used in show folder names
    pub words_separator_show: String,
    /// Word separator used in renamed file names
    pub words_separator_file: String,
}

impl Default for TvShowSettings {
    fn default() -> Self {
        Self {
            numbering_schema: DEFAULT_NUMBERING_SCHEMA.to_string(),
            season_schema: DEFAULT_SEASON_SCHEMA.to_string(),
            words_separator_show: DEFAULT_WORDS_SEPARATOR_SHOW.to_string(),
            words_separator_file: DEFAULT_WORDS_SEPARATOR_FILE.to_string(),
        }
    }
}

/// What to do with a file that could not be placed normally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FateAction {
    /// Leave the file where it is
    #[default]
    Ignore,
    /// Delete the file
    Delete,
    /// Move the file to the policy's `move_path`
    Move,
}

impl std::fmt::Display for FateAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FateAction::Ignore => write!(f, "ignore"),
            FateAction::Delete => write!(f, "delete"),
            FateAction::Move => write!(f, "move"),
        }
    }
}

/// Policy for unknown, duplicate or errored files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FilePolicy {
    pub action: FateAction,
    /// Quarantine folder, required when action is `move`
    pub move_path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration, with fallback locations.
    ///
    /// Attempts in order:
    /// 1. the explicitly provided path
    /// 2. `shelver.toml` in the current directory
    /// 3. `<config dir>/shelver/config.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file is missing or
    /// unreadable, or if any found file fails to parse. With no file
    /// found anywhere, the (empty) defaults are returned; a run will
    /// then fail with `NoOutputFolders` before touching anything.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local = PathBuf::from("shelver.toml");
        if local.exists() {
            return Self::load_from_file(&local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join("shelver").join("config.toml");
            if user.exists() {
                return Self::load_from_file(&user);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write the default configuration template.
    ///
    /// # Errors
    ///
    /// Refuses to overwrite an existing file.
    pub fn write_template(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }

        fs::write(path, DEFAULT_TEMPLATE).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Starter configuration written by `shelver init`.
const DEFAULT_TEMPLATE: &str = r#"# shelver configuration

input_folders = ["/watch/incoming"]

# Destination roots, one per content category. Several targets may share
# a category; for TV shows the last one listed is the autocreate target.
[[output_folders]]
path = "/library/tvshows"
contents = "tvshows"

[[output_folders]]
path = "/library/music"
contents = "music"

[[output_folders]]
path = "/library/videos"
contents = "videos"

# Classification rules, tried in order. TV show rules are always tried
# before the rest. Filters run against the extension-stripped file name
# and use named capture groups: name, season, episode, rest.
[[content_classes]]
name = "tvshows"
extensions = ["avi", "mkv", "mp4"]
filters = [
    "(?<name>.+)S(?<season>[0-9]{1,3})E(?<episode>[0-9]{1,3})(?<rest>.*)",
    "(?<name>.+)(?<season>[0-9]{1,2})x(?<episode>[0-9]{1,3})(?<rest>.*)",
    "(?<name>.+[^a-zA-Z0-9(])(?<season>[0-9])(?<episode>[0-9]{2})(?:(?<rest>[^0-9].*)|$)",
]

[[content_classes]]
name = "videos"
extensions = ["avi", "mkv", "mp4", "mov"]

[[content_classes]]
name = "music"
extensions = ["mp3", "ogg", "flac"]

[tvshows]
numbering_schema = "S{season:2}E{episode:2}"
season_schema = "Season_{season:2}"
words_separator_show = "_"
words_separator_file = "_"

[unknown_files]
action = "ignore"

[duplicate_files]
action = "ignore"

[error_files]
action = "ignore"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_tvshow_settings_match_documented_defaults() {
        let settings = TvShowSettings::default();
        assert_eq!(settings.numbering_schema, "S{season:2}E{episode:2}");
        assert_eq!(settings.season_schema, "Season_{season:2}");
        assert_eq!(settings.words_separator_show, "_");
        assert_eq!(settings.words_separator_file, "_");
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let result = Config::load_from_file(Path::new("/no/such/shelver.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            input_folders = ["/watch"]

            [[output_folders]]
            path = "/library/videos"
            contents = "videos"

            [[content_classes]]
            name = "videos"
            extensions = ["avi"]
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.input_folders, vec![PathBuf::from("/watch")]);
        assert_eq!(config.output_folders.len(), 1);
        assert!(config.output_folders[0].auto_create);
        assert_eq!(config.content_classes[0].name, "videos");
        assert_eq!(config.unknown_files.action, FateAction::Ignore);
    }

    #[test]
    fn parse_file_policy_actions() {
        let toml = r#"
            [unknown_files]
            action = "delete"

            [duplicate_files]
            action = "move"
            move_path = "/quarantine"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.unknown_files.action, FateAction::Delete);
        assert_eq!(config.duplicate_files.action, FateAction::Move);
        assert_eq!(
            config.duplicate_files.move_path,
            Some(PathBuf::from("/quarantine"))
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = r#"
            output_foldres = []
        "#;

        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn template_round_trips_through_the_parser() {
        let config: Config = toml::from_str(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(config.content_classes[0].name, "tvshows");
        assert_eq!(config.content_classes[0].filters.len(), 3);
    }

    #[test]
    fn write_template_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shelver.toml");

        Config::write_template(&path).unwrap();
        let result = Config::write_template(&path);
        assert!(matches!(result, Err(ConfigError::AlreadyExists { .. })));

        let loaded = Config::load_from_file(&path).unwrap();
        assert!(!loaded.output_folders.is_empty());
    }
}
