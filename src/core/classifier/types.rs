//! Types for the classifier module.

use crate::config::ContentClass;
use crate::core::matcher;
use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Name of the content class that gets TV show treatment.
pub const TVSHOWS_CLASS: &str = "tvshows";
/// Name of the content class that gets album-folder treatment.
pub const MUSIC_CLASS: &str = "music";

/// A single classification rule: a category name plus the extensions
/// and/or filter regexes that put a file into it.
///
/// A criterion with no extensions and no filters matches nothing.
#[derive(Debug, Clone)]
pub struct Criterion {
    pub name: String,
    pub extensions: Vec<String>,
    pub filters: Vec<Regex>,
}

impl Criterion {
    /// Whether this criterion describes TV show files.
    pub fn is_tvshow(&self) -> bool {
        self.name == TVSHOWS_CLASS
    }
}

/// The ordered rule set, built once per run from configuration and
/// immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    criteria: Vec<Criterion>,
}

impl Criteria {
    /// Build the rule set from raw configuration, compiling every
    /// filter pattern up front.
    ///
    /// # Errors
    ///
    /// Fails on an empty class name or an invalid filter regex.
    pub fn from_config(content_classes: &[ContentClass]) -> Result<Self, ConfigError> {
        let mut criteria = Self::default();
        for class in content_classes {
            criteria.push(&class.name, class.extensions.clone(), &class.filters)?;
        }
        Ok(criteria)
    }

    /// Append one criterion, compiling its filter patterns.
    pub fn push(
        &mut self,
        name: &str,
        extensions: Vec<String>,
        filters: &[String],
    ) -> Result<(), ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyClassName);
        }

        let compiled = filters
            .iter()
            .map(|pattern| {
                matcher::compile_filter(pattern).map_err(|e| ConfigError::InvalidFilter {
                    class: name.to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.criteria.push(Criterion {
            name: name.to_string(),
            extensions,
            filters: compiled,
        });

        Ok(())
    }

    /// Iterate criteria in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// The structured result of classifying one file.
///
/// An empty `category` means no rule matched. For `tvshows` the
/// `show_name` is always non-empty; `show_folder_name` stays empty until
/// the resolver finds an existing folder for the show on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Matched category name; empty when unclassified
    pub category: String,
    /// Original file name, with extension
    pub file_name: String,
    /// File name without the extension
    pub base_name: String,
    /// Extension without the dot, may be empty
    pub extension: String,
    /// Season number, 0 when not captured
    pub season: u32,
    /// Episode number, 0 when not captured
    pub episode: u32,
    /// Show name with separators normalized to spaces
    pub show_name: String,
    /// Trailing filename fragment after the episode marker
    pub show_rest: String,
    /// Exact on-disk folder name of an existing show folder
    pub show_folder_name: String,
    /// Album folder name for music found in a subfolder
    pub album_name: String,
}

impl Classification {
    /// Whether any rule matched this file.
    pub fn is_classified(&self) -> bool {
        !self.category.is_empty()
    }
}
