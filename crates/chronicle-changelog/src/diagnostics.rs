//! Run diagnostics

use serde::{Deserialize, Serialize};

use crate::parser::SkipReason;

/// A commit left out of the changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCommit {
    /// Abbreviated hash
    pub short_hash: String,
    /// First line of the message
    pub summary: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Counts and skip records collected during a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Commits read from the source
    pub total: usize,
    /// Distinct commits that parsed as conventional commits
    pub parsed: usize,
    /// Commits the parser skipped, newest first
    pub skipped: Vec<SkippedCommit>,
    /// Hashes the source supplied more than once
    pub duplicates: Vec<String>,
    /// Tags carried only by a dropped duplicate
    pub dropped_tags: Vec<String>,
}

impl Diagnostics {
    /// Number of skipped commits
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Whether anything was skipped or dropped
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty() || !self.duplicates.is_empty()
    }
}
