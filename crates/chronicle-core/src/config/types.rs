//! Configuration types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::types::{Category, SemverImpact};

/// Main configuration for Chronicle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version of the config schema
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Project name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Git configuration
    pub git: GitConfig,

    /// Changelog configuration
    pub changelog: ChangelogConfig,
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Only tags matching this regex mark release boundaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_pattern: Option<String>,

    /// Tag format, used to suggest the next tag name
    pub tag_format: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            tag_pattern: None,
            tag_format: "v{version}".to_string(),
        }
    }
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file path
    pub file: PathBuf,

    /// Prepend to an existing changelog file instead of replacing it
    pub prepend: bool,

    /// Inline template, overriding the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Template file, relative to the working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_file: Option<PathBuf>,

    /// Heading used for commits after the newest tag
    pub unreleased_label: String,

    /// strftime format for release dates
    pub date_format: String,

    /// Cluster commits sharing a scope within each section
    pub cluster_scopes: bool,

    /// Commit type to section mapping
    pub types: BTreeMap<String, CommitTypeConfig>,

    /// Commit type to version bump mapping, independent of `types`
    pub impacts: BTreeMap<String, SemverImpact>,

    /// Section order and labels
    pub categories: CategoriesConfig,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        let mut types = BTreeMap::new();
        for (commit_type, category) in [
            ("feat", Category::Features),
            ("fix", Category::BugFixes),
            ("perf", Category::Performance),
            ("refactor", Category::Refactor),
            ("docs", Category::Documentation),
            ("style", Category::Styling),
            ("test", Category::Testing),
            ("build", Category::Build),
            ("ci", Category::Ci),
            ("chore", Category::Chore),
            ("revert", Category::Revert),
        ] {
            types.insert(commit_type.to_string(), CommitTypeConfig::new(category));
        }

        let mut impacts = BTreeMap::new();
        impacts.insert("feat".to_string(), SemverImpact::Minor);
        impacts.insert("fix".to_string(), SemverImpact::Patch);

        Self {
            file: PathBuf::from("CHANGELOG.md"),
            prepend: false,
            template: None,
            template_file: None,
            unreleased_label: "Unreleased".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            cluster_scopes: false,
            types,
            impacts,
            categories: CategoriesConfig::default(),
        }
    }
}

/// Configuration for a commit type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitTypeConfig {
    /// Section the type is listed under
    pub category: Category,
    /// Keep the type out of the rendered changelog
    #[serde(default)]
    pub hidden: bool,
}

impl CommitTypeConfig {
    /// Visible mapping to a category
    pub fn new(category: Category) -> Self {
        Self {
            category,
            hidden: false,
        }
    }

    /// Mark the type hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Section ordering and labels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoriesConfig {
    /// Display order; must list every category exactly once
    pub order: Vec<Category>,

    /// Label overrides keyed by category id
    pub labels: BTreeMap<String, String>,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            order: Category::ALL.to_vec(),
            labels: BTreeMap::new(),
        }
    }
}

impl CategoriesConfig {
    /// Heading for a category, falling back to its default label
    pub fn label(&self, category: Category) -> String {
        self.labels
            .iter()
            .find(|(key, _)| key.parse::<Category>().ok() == Some(category))
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| category.default_label().to_string())
    }

    /// Position of a category in the display order
    pub fn rank(&self, category: Category) -> usize {
        self.order
            .iter()
            .position(|c| *c == category)
            .unwrap_or(self.order.len())
    }
}
