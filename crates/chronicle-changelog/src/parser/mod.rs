//! Commit parsing

mod conventional;

pub use conventional::ConventionalParser;
pub(crate) use conventional::strip_decorations;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ParsedCommit;
use chronicle_git::CommitInfo;

/// Why a commit was left out of the changelog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The message is empty or only whitespace
    EmptyMessage,
    /// The header line does not follow `type(scope)!: subject`
    MalformedHeader,
    /// The header has no text after the colon
    EmptySubject,
}

impl SkipReason {
    /// Short machine-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "empty_message",
            Self::MalformedHeader => "malformed_header",
            Self::EmptySubject => "empty_subject",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EmptyMessage => "empty message",
            Self::MalformedHeader => "header is not a conventional commit",
            Self::EmptySubject => "empty subject",
        };
        f.write_str(text)
    }
}

/// Result of parsing one raw commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The commit follows the grammar
    Parsed(ParsedCommit),
    /// The commit is skipped, never an error
    Skip(SkipReason),
}

impl ParseOutcome {
    /// The parsed commit, if any
    pub fn parsed(self) -> Option<ParsedCommit> {
        match self {
            Self::Parsed(commit) => Some(commit),
            Self::Skip(_) => None,
        }
    }
}

/// Trait for commit parsers
pub trait CommitParser: Send + Sync {
    /// Parse a raw commit. Malformed input is a skip, not an error.
    fn parse(&self, commit: &CommitInfo) -> ParseOutcome;
}
