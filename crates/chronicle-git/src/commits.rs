//! Commit history operations

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use git2::{Revwalk, Sort};
use tracing::{debug, info, instrument};

use crate::repository::{GitRepo, Result};
use crate::source::CommitSource;
use crate::types::CommitInfo;

/// Newest-first walk of the history reachable from HEAD
pub struct GitHistory<'repo> {
    repo: &'repo git2::Repository,
    walk: Option<Revwalk<'repo>>,
    tags: HashMap<String, String>,
}

impl GitRepo {
    /// Walk the history from HEAD, annotating commits with release tags.
    ///
    /// Only tags matching `tag_pattern` mark release boundaries. An unborn
    /// HEAD yields an empty history.
    #[instrument(skip(self), fields(tag_pattern))]
    pub fn history(&self, tag_pattern: Option<&str>) -> Result<GitHistory<'_>> {
        let tags = self.tag_index(tag_pattern)?;

        let walk = match self.head_commit()? {
            Some(head) => {
                let mut revwalk = self.repo.revwalk()?;
                revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
                revwalk.push(head.id())?;
                Some(revwalk)
            }
            None => None,
        };

        info!(tag_count = tags.len(), empty = walk.is_none(), "walking commit history");
        Ok(GitHistory {
            repo: &self.repo,
            walk,
            tags,
        })
    }

    /// Collect the full history, newest first
    pub fn all_commits(&self, tag_pattern: Option<&str>) -> Result<Vec<CommitInfo>> {
        let mut history = self.history(tag_pattern)?;
        let mut commits = Vec::new();
        while let Some(commit) = history.next_commit()? {
            commits.push(commit);
        }
        debug!(count = commits.len(), "collected commit history");
        Ok(commits)
    }
}

impl CommitSource for GitHistory<'_> {
    fn next_commit(&mut self) -> Result<Option<CommitInfo>> {
        let Some(walk) = self.walk.as_mut() else {
            return Ok(None);
        };

        match walk.next() {
            Some(oid) => {
                let commit = self.repo.find_commit(oid?)?;
                let mut info = commit_to_info(&commit);
                if let Some(tag) = self.tags.get(&info.hash) {
                    info = info.with_tag(tag.clone());
                }
                Ok(Some(info))
            }
            None => Ok(None),
        }
    }
}

/// Convert a git2 Commit to CommitInfo
fn commit_to_info(commit: &git2::Commit<'_>) -> CommitInfo {
    let author = commit.author();

    let message = commit
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| String::from_utf8_lossy(commit.message_bytes()).into_owned());

    let timestamp = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    CommitInfo::new(
        commit.id().to_string(),
        message,
        author.name().unwrap_or("Unknown"),
        author.email().unwrap_or("unknown@example.com"),
        timestamp,
    )
    .with_parents(commit.parent_ids().map(|id| id.to_string()).collect())
}
