//! Core types for Chronicle

use serde::{Deserialize, Serialize};

/// A changelog section
///
/// The set of categories is closed: commit types without a mapping land in
/// [`Category::Other`], so a changelog never grows sections on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Breaking changes, from `!` or a `BREAKING CHANGE` footer
    Breaking,
    /// New features
    Features,
    /// Bug fixes
    BugFixes,
    /// Performance improvements
    Performance,
    /// Refactoring
    Refactor,
    /// Documentation
    Documentation,
    /// Code style
    Styling,
    /// Tests
    Testing,
    /// Build system
    Build,
    /// Continuous integration
    Ci,
    /// Maintenance
    Chore,
    /// Reverted changes
    Revert,
    /// Anything without a mapping
    Other,
}

impl Category {
    /// Every category, in default display order
    pub const ALL: [Category; 13] = [
        Self::Breaking,
        Self::Features,
        Self::BugFixes,
        Self::Performance,
        Self::Refactor,
        Self::Documentation,
        Self::Styling,
        Self::Testing,
        Self::Build,
        Self::Ci,
        Self::Chore,
        Self::Revert,
        Self::Other,
    ];

    /// Stable identifier used in configuration and templates
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breaking => "breaking",
            Self::Features => "features",
            Self::BugFixes => "bug_fixes",
            Self::Performance => "performance",
            Self::Refactor => "refactor",
            Self::Documentation => "documentation",
            Self::Styling => "styling",
            Self::Testing => "testing",
            Self::Build => "build",
            Self::Ci => "ci",
            Self::Chore => "chore",
            Self::Revert => "revert",
            Self::Other => "other",
        }
    }

    /// Default section heading
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Breaking => "⚠ BREAKING CHANGES",
            Self::Features => "Features",
            Self::BugFixes => "Bug Fixes",
            Self::Performance => "Performance",
            Self::Refactor => "Refactor",
            Self::Documentation => "Documentation",
            Self::Styling => "Styling",
            Self::Testing => "Testing",
            Self::Build => "Build",
            Self::Ci => "CI",
            Self::Chore => "Chore",
            Self::Revert => "Reverts",
            Self::Other => "Other Changes",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Version bump class implied by a commit
///
/// Variants are declared in ascending order, so `Ord` gives
/// `None < Patch < Minor < Major`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SemverImpact {
    /// No release required
    #[default]
    None,
    /// Bug fixes
    Patch,
    /// New features
    Minor,
    /// Breaking changes
    Major,
}

impl SemverImpact {
    /// Returns the string representation of the impact
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl std::fmt::Display for SemverImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SemverImpact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            _ => Err(format!("Unknown semver impact: {}", s)),
        }
    }
}

/// Pipeline stage, used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Reading commits from the source
    Listing,
    /// Expanding the template
    Rendering,
    /// Handing the document to the sink
    Writing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Listing => "listing",
            Self::Rendering => "rendering",
            Self::Writing => "writing",
        };
        write!(f, "{}", name)
    }
}
