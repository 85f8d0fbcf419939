//! Changelog types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chronicle_core::{Category, SemverImpact};

/// A commit that matched the conventional-commit grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommit {
    /// Original commit hash
    pub hash: String,
    /// Abbreviated hash for display
    pub short_hash: String,
    /// Commit type (feat, fix, etc.), lowercased
    pub commit_type: String,
    /// Scope (optional, in parentheses)
    pub scope: Option<String>,
    /// Set by a `!` marker or a `BREAKING CHANGE` footer
    pub breaking: bool,
    /// Header subject, trimmed
    pub subject: String,
    /// Free-form body between the header and the footers
    pub body: Option<String>,
    /// Footer fields, in message order
    pub footers: Vec<Footer>,
    /// Author name
    pub author: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

impl ParsedCommit {
    /// Subject with leading emoji and gitmoji shortcodes removed.
    ///
    /// Falls back to the raw subject when nothing else is left.
    pub fn display_subject(&self) -> &str {
        crate::parser::strip_decorations(&self.subject)
    }

    /// Description from the first breaking-change footer, if any
    pub fn breaking_description(&self) -> Option<&str> {
        self.footers
            .iter()
            .find(|f| f.is_breaking())
            .map(|f| f.value.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// A footer field from a conventional commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    /// Footer token (e.g., "BREAKING CHANGE", "Fixes", "Refs")
    pub token: String,
    /// Footer value, continuation lines joined with newlines
    pub value: String,
}

impl Footer {
    /// Create a footer
    pub fn new(token: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            value: value.into(),
        }
    }

    /// `BREAKING CHANGE` or `BREAKING-CHANGE`
    pub fn is_breaking(&self) -> bool {
        self.token == "BREAKING CHANGE" || self.token == "BREAKING-CHANGE"
    }
}

/// A parsed commit with its category and version impact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedCommit {
    /// The parsed commit
    #[serde(flatten)]
    pub commit: ParsedCommit,
    /// Section the commit is listed under
    pub category: Category,
    /// Version impact of the commit on its own
    pub impact: SemverImpact,
    /// Hidden commits count toward the impact but are not listed
    pub hidden: bool,
}

/// Commits of one category within a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBucket {
    /// Category of every commit in the bucket
    pub category: Category,
    /// Section heading
    pub label: String,
    /// Commits, newest first
    pub commits: Vec<ClassifiedCommit>,
}

/// A contiguous run of history closed by a release tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseGroup {
    /// Tag name, or `None` for unreleased work
    pub name: Option<String>,
    /// Timestamp of the tagged commit
    pub date: Option<DateTime<Utc>>,
    /// Every parsed commit in the group, hidden ones included, newest first
    pub commits: Vec<ClassifiedCommit>,
    /// Visible commits by category, in display order, empty buckets omitted
    pub buckets: Vec<CategoryBucket>,
    /// Highest impact of any commit in the group
    pub impact: SemverImpact,
}

impl ReleaseGroup {
    /// Whether this group collects commits after the newest tag
    pub fn is_unreleased(&self) -> bool {
        self.name.is_none()
    }

    /// Number of commits listed in the buckets
    pub fn visible_count(&self) -> usize {
        self.buckets.iter().map(|b| b.commits.len()).sum()
    }
}
