//! Tag operations

use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;
use chronicle_core::error::GitError;

impl GitRepo {
    /// Get all tags, peeled to the commit they point at
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            if let Ok(commit) = self.repo.find_commit(oid) {
                tags.push(TagInfo::new(&name, commit.id().to_string()));
            } else if let Ok(target) = self.repo.find_tag(oid).and_then(|t| t.peel()) {
                // Annotated tag
                tags.push(TagInfo::new(&name, target.id().to_string()));
            }

            true
        })?;

        debug!(count = tags.len(), "listed all tags");
        Ok(tags)
    }

    /// Get tags matching a pattern
    pub fn tags_matching(&self, pattern: &str) -> Result<Vec<TagInfo>> {
        let regex = Regex::new(pattern).map_err(|e| GitError::InvalidTagPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let matching: Vec<_> = self
            .tags()?
            .into_iter()
            .filter(|t| regex.is_match(&t.name))
            .collect();

        Ok(matching)
    }

    /// Map commit hash to the release tag annotating it
    #[instrument(skip(self), fields(pattern))]
    pub fn tag_index(&self, pattern: Option<&str>) -> Result<HashMap<String, String>> {
        let tags = match pattern {
            Some(p) => self.tags_matching(p)?,
            None => self.tags()?,
        };

        Ok(index_tags(tags))
    }
}

/// Pick one tag per commit.
///
/// When several tags point at the same commit the highest semantic version
/// wins; tags without a version lose to any versioned tag, and remaining ties
/// go to the lexicographically greatest name.
pub(crate) fn index_tags(tags: Vec<TagInfo>) -> HashMap<String, String> {
    let mut best: HashMap<String, TagInfo> = HashMap::new();

    for tag in tags {
        match best.get(&tag.commit_hash) {
            Some(current) if !outranks(&tag, current) => {}
            _ => {
                best.insert(tag.commit_hash.clone(), tag);
            }
        }
    }

    best.into_iter().map(|(hash, tag)| (hash, tag.name)).collect()
}

fn outranks(candidate: &TagInfo, current: &TagInfo) -> bool {
    match (candidate.semver(), current.semver()) {
        (Some(a), Some(b)) if a != b => a > b,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        _ => candidate.name > current.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::path::Path;
    use tempfile::TempDir;

    fn setup_repo_with_tag() -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let sig = Signature::now("Test", "test@example.com").unwrap();

        std::fs::write(temp.path().join("file.txt"), "content").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("file.txt")).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, "feat: initial", &tree, &[])
            .unwrap();

        let commit = repo.find_commit(oid).unwrap();
        repo.tag_lightweight("v1.0.0", commit.as_object(), false)
            .unwrap();
        repo.tag("release-candidate", commit.as_object(), &sig, "rc", false)
            .unwrap();

        let git_repo = GitRepo::open(temp.path()).unwrap();
        (temp, git_repo)
    }

    #[test]
    fn test_list_tags() {
        let (_temp, repo) = setup_repo_with_tag();
        let mut names: Vec<_> = repo.tags().unwrap().into_iter().map(|t| t.name).collect();
        names.sort();
        assert_eq!(names, vec!["release-candidate", "v1.0.0"]);
    }

    #[test]
    fn test_annotated_tag_peels_to_commit() {
        let (_temp, repo) = setup_repo_with_tag();
        let tags = repo.tags().unwrap();
        let annotated = tags.iter().find(|t| t.name == "release-candidate").unwrap();
        let lightweight = tags.iter().find(|t| t.name == "v1.0.0").unwrap();
        assert_eq!(annotated.commit_hash, lightweight.commit_hash);
    }

    #[test]
    fn test_tags_matching() {
        let (_temp, repo) = setup_repo_with_tag();
        let tags = repo.tags_matching(r"^v\d+").unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v1.0.0");
    }

    #[test]
    fn test_tags_matching_invalid_pattern() {
        let (_temp, repo) = setup_repo_with_tag();
        let result = repo.tags_matching("v(");
        assert!(matches!(result, Err(GitError::InvalidTagPattern { .. })));
    }

    #[test]
    fn test_tag_index_prefers_versioned_tag() {
        let (_temp, repo) = setup_repo_with_tag();
        let index = repo.tag_index(None).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.values().next().unwrap(), "v1.0.0");
    }

    #[test]
    fn test_index_tags_highest_version_wins() {
        let index = index_tags(vec![
            TagInfo::new("v1.2.0", "c1"),
            TagInfo::new("v1.10.0", "c1"),
            TagInfo::new("v1.9.0", "c1"),
            TagInfo::new("beta", "c2"),
            TagInfo::new("alpha", "c2"),
        ]);
        assert_eq!(index["c1"], "v1.10.0");
        assert_eq!(index["c2"], "beta");
    }
}
