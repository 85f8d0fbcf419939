//! Git types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw commit record, as supplied to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit hash (full)
    pub hash: String,
    /// Short hash (first 7 characters)
    pub short_hash: String,
    /// Parent commit hashes
    pub parents: Vec<String>,
    /// Full commit message, header line included
    pub message: String,
    /// Author name
    pub author: String,
    /// Author email
    pub author_email: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
    /// Release tag pointing at exactly this commit
    pub tag: Option<String>,
}

impl CommitInfo {
    /// Create a new CommitInfo
    pub fn new(
        hash: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        author_email: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let hash = hash.into();
        let short_hash = hash.chars().take(7).collect();

        Self {
            hash,
            short_hash,
            parents: Vec::new(),
            message: message.into(),
            author: author.into(),
            author_email: author_email.into(),
            timestamp,
            tag: None,
        }
    }

    /// Set the parent hashes
    pub fn with_parents(mut self, parents: Vec<String>) -> Self {
        self.parents = parents;
        self
    }

    /// Attach a release tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// A tag, peeled to the commit it marks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name without `refs/tags/`
    pub name: String,
    /// Commit the tag resolves to
    pub commit_hash: String,
    /// Version carried in the name, if any
    pub version: Option<String>,
}

impl TagInfo {
    /// Create a tag record, extracting the version from its name
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            version: extract_version(&name),
            commit_hash: commit_hash.into(),
            name,
        }
    }

    /// Parsed semantic version, if the tag carries one
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(self.version.as_deref()?).ok()
    }
}

/// Version part of a tag name.
///
/// Understands `1.2.3`, `v1.2.3`, `name@1.2.3`, `name@v1.2.3` and
/// `name-v1.2.3`. The result only has to look like a version (a numeric
/// major and at least one dot); strict parsing is left to the caller.
pub fn extract_version(tag: &str) -> Option<String> {
    let candidates = [
        tag.rsplit_once('@').map(|(_, v)| v),
        tag.rsplit_once("-v").map(|(_, v)| v),
        Some(tag),
    ];

    candidates
        .into_iter()
        .flatten()
        .map(|v| v.strip_prefix('v').unwrap_or(v))
        .find(|v| looks_like_version(v))
        .map(str::to_string)
}

fn looks_like_version(s: &str) -> bool {
    match s.split_once('.') {
        Some((major, _)) => !major.is_empty() && major.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
