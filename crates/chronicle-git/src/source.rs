//! Commit sources
//!
//! A source yields raw commits newest-first. `Ok(None)` is the end of the
//! stream; an `Err` means the source itself failed and the run must stop.

use crate::repository::Result;
use crate::types::CommitInfo;

/// Supplier of raw commit records, newest first
pub trait CommitSource {
    /// Next commit, or `None` once the history is exhausted
    fn next_commit(&mut self) -> Result<Option<CommitInfo>>;

    /// Number of commits left, when known up front
    fn size_hint(&self) -> Option<usize> {
        None
    }
}

impl<S: CommitSource + ?Sized> CommitSource for &mut S {
    fn next_commit(&mut self) -> Result<Option<CommitInfo>> {
        (**self).next_commit()
    }

    fn size_hint(&self) -> Option<usize> {
        (**self).size_hint()
    }
}

impl<S: CommitSource + ?Sized> CommitSource for Box<S> {
    fn next_commit(&mut self) -> Result<Option<CommitInfo>> {
        (**self).next_commit()
    }

    fn size_hint(&self) -> Option<usize> {
        (**self).size_hint()
    }
}

/// In-memory source over an already ordered list
#[derive(Debug)]
pub struct VecSource {
    commits: std::vec::IntoIter<CommitInfo>,
}

impl VecSource {
    /// Create a source from commits ordered newest first
    pub fn new(commits: Vec<CommitInfo>) -> Self {
        Self {
            commits: commits.into_iter(),
        }
    }
}

impl From<Vec<CommitInfo>> for VecSource {
    fn from(commits: Vec<CommitInfo>) -> Self {
        Self::new(commits)
    }
}

impl CommitSource for VecSource {
    fn next_commit(&mut self) -> Result<Option<CommitInfo>> {
        Ok(self.commits.next())
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.commits.len())
    }
}
