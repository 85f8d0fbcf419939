//! Release grouping
//!
//! History arrives newest first. Commits before the first tag belong to the
//! unreleased group; every tagged commit closes the open group and starts a
//! new one named after the tag, with the tagged commit as its first member.

use std::collections::HashSet;
use std::mem;

use chrono::{DateTime, Utc};
use tracing::debug;

use chronicle_core::config::CategoriesConfig;
use chronicle_core::Category;

use crate::resolver::resolve;
use crate::types::{CategoryBucket, ClassifiedCommit, ReleaseGroup};

/// One position in history, in newest-first order
#[derive(Debug, Clone)]
pub struct GroupEntry {
    /// Commit hash, used to drop duplicates
    pub hash: String,
    /// Release tag on this commit
    pub tag: Option<String>,
    /// Commit timestamp, used as the release date when tagged
    pub timestamp: DateTime<Utc>,
    /// The classified commit, or `None` when it was skipped by the parser
    pub commit: Option<ClassifiedCommit>,
}

/// Output of grouping
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    /// Release groups, newest first
    pub groups: Vec<ReleaseGroup>,
    /// Hashes seen more than once; only the first occurrence was kept
    pub duplicates: Vec<String>,
}

/// Partitions classified history into release groups
#[derive(Debug, Clone, Default)]
pub struct Grouper {
    categories: CategoriesConfig,
}

#[derive(Default)]
struct OpenGroup {
    name: Option<String>,
    date: Option<DateTime<Utc>>,
    commits: Vec<ClassifiedCommit>,
}

impl OpenGroup {
    /// Unreleased groups are only kept when they hold commits
    fn is_worth_keeping(&self) -> bool {
        self.name.is_some() || !self.commits.is_empty()
    }
}

impl Grouper {
    /// Create a grouper with the given section order and labels
    pub fn new(categories: CategoriesConfig) -> Self {
        Self { categories }
    }

    /// Group entries ordered newest first
    pub fn group<I>(&self, entries: I) -> Grouping
    where
        I: IntoIterator<Item = GroupEntry>,
    {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        let mut groups = Vec::new();
        let mut open = OpenGroup::default();

        for entry in entries {
            if !seen.insert(entry.hash.clone()) {
                debug!(hash = %entry.hash, tag = ?entry.tag, "dropping duplicate commit");
                duplicates.push(entry.hash);
                continue;
            }

            if let Some(tag) = entry.tag {
                let next = OpenGroup {
                    name: Some(tag),
                    date: Some(entry.timestamp),
                    commits: Vec::new(),
                };
                let closed = mem::replace(&mut open, next);
                if closed.is_worth_keeping() {
                    groups.push(self.finish(closed));
                }
            }

            if let Some(commit) = entry.commit {
                open.commits.push(commit);
            }
        }

        if open.is_worth_keeping() {
            groups.push(self.finish(open));
        }

        Grouping { groups, duplicates }
    }

    fn finish(&self, group: OpenGroup) -> ReleaseGroup {
        let buckets: Vec<CategoryBucket> = self
            .display_order()
            .into_iter()
            .filter_map(|category| {
                let commits: Vec<ClassifiedCommit> = group
                    .commits
                    .iter()
                    .filter(|c| !c.hidden && c.category == category)
                    .cloned()
                    .collect();
                (!commits.is_empty()).then(|| CategoryBucket {
                    category,
                    label: self.categories.label(category),
                    commits,
                })
            })
            .collect();

        let impact = resolve(&group.commits);
        debug!(
            release = group.name.as_deref().unwrap_or("unreleased"),
            commits = group.commits.len(),
            buckets = buckets.len(),
            %impact,
            "closed release group"
        );

        ReleaseGroup {
            name: group.name,
            date: group.date,
            commits: group.commits,
            buckets,
            impact,
        }
    }

    /// Categories by configured rank; unranked ones keep their natural order at the end
    fn display_order(&self) -> Vec<Category> {
        let mut order = Category::ALL.to_vec();
        order.sort_by_key(|category| self.categories.rank(*category));
        order
    }
}
