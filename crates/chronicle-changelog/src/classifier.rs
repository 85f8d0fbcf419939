//! Commit classification
//!
//! Maps a parsed commit to a category and a semver impact. Category and
//! impact come from two independent tables, so a type can be listed under
//! one section while carrying any impact.

use std::collections::HashMap;

use chronicle_core::config::{ChangelogConfig, CommitTypeConfig};
use chronicle_core::{Category, SemverImpact};

use crate::types::{ClassifiedCommit, ParsedCommit};

/// Type and impact tables, keyed by lowercased commit type
#[derive(Debug, Clone)]
pub struct Classifier {
    types: HashMap<String, CommitTypeConfig>,
    impacts: HashMap<String, SemverImpact>,
}

impl Classifier {
    /// Build the lookup tables from changelog configuration
    pub fn new(config: &ChangelogConfig) -> Self {
        let types = config
            .types
            .iter()
            .map(|(name, cfg)| (name.to_lowercase(), cfg.clone()))
            .collect();
        let impacts = config
            .impacts
            .iter()
            .map(|(name, impact)| (name.to_lowercase(), *impact))
            .collect();

        Self { types, impacts }
    }

    /// Category and impact of a commit.
    ///
    /// Breaking commits always land in [`Category::Breaking`] with a major
    /// impact. Unknown types fall back to [`Category::Other`] and no impact.
    pub fn classify(&self, commit: &ParsedCommit) -> (Category, SemverImpact) {
        if commit.breaking {
            return (Category::Breaking, SemverImpact::Major);
        }

        let key = commit.commit_type.to_lowercase();
        let category = self
            .types
            .get(&key)
            .map_or(Category::Other, |cfg| cfg.category);
        let impact = self.impacts.get(&key).copied().unwrap_or_default();

        (category, impact)
    }

    /// Whether the commit's type is configured as hidden.
    ///
    /// Breaking commits are never hidden.
    pub fn is_hidden(&self, commit: &ParsedCommit) -> bool {
        !commit.breaking
            && self
                .types
                .get(&commit.commit_type.to_lowercase())
                .is_some_and(|cfg| cfg.hidden)
    }

    /// Classify a commit, taking ownership of it
    pub fn apply(&self, commit: ParsedCommit) -> ClassifiedCommit {
        let (category, impact) = self.classify(&commit);
        let hidden = self.is_hidden(&commit);

        ClassifiedCommit {
            commit,
            category,
            impact,
            hidden,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ChangelogConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn commit(commit_type: &str, breaking: bool) -> ParsedCommit {
        ParsedCommit {
            hash: "abc1234567890".to_string(),
            short_hash: "abc1234".to_string(),
            commit_type: commit_type.to_string(),
            scope: None,
            breaking,
            subject: "something".to_string(),
            body: None,
            footers: Vec::new(),
            author: "Test".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_default_mapping() {
        let classifier = Classifier::default();

        assert_eq!(
            classifier.classify(&commit("feat", false)),
            (Category::Features, SemverImpact::Minor)
        );
        assert_eq!(
            classifier.classify(&commit("fix", false)),
            (Category::BugFixes, SemverImpact::Patch)
        );
        assert_eq!(
            classifier.classify(&commit("docs", false)),
            (Category::Documentation, SemverImpact::None)
        );
    }

    #[test]
    fn test_breaking_overrides_type() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(&commit("docs", true)),
            (Category::Breaking, SemverImpact::Major)
        );
    }

    #[test]
    fn test_unknown_type_is_other() {
        let classifier = Classifier::default();
        let classified = classifier.apply(commit("wip", false));

        assert_eq!(classified.category, Category::Other);
        assert_eq!(classified.impact, SemverImpact::None);
        assert!(!classified.hidden);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let mut config = ChangelogConfig::default();
        config
            .types
            .insert("Deps".to_string(), CommitTypeConfig::new(Category::Build));
        config
            .impacts
            .insert("DEPS".to_string(), SemverImpact::Patch);
        let classifier = Classifier::new(&config);

        assert_eq!(
            classifier.classify(&commit("deps", false)),
            (Category::Build, SemverImpact::Patch)
        );
    }

    #[test]
    fn test_impact_independent_of_category() {
        let mut config = ChangelogConfig::default();
        config.impacts.insert("perf".to_string(), SemverImpact::Minor);
        let classifier = Classifier::new(&config);

        assert_eq!(
            classifier.classify(&commit("perf", false)),
            (Category::Performance, SemverImpact::Minor)
        );
    }

    #[test]
    fn test_hidden_types() {
        let mut config = ChangelogConfig::default();
        config.types.insert(
            "chore".to_string(),
            CommitTypeConfig::new(Category::Chore).hidden(),
        );
        config.impacts.insert("chore".to_string(), SemverImpact::Patch);
        let classifier = Classifier::new(&config);

        let hidden = classifier.apply(commit("chore", false));
        assert!(hidden.hidden);
        assert_eq!(hidden.impact, SemverImpact::Patch);

        let breaking = classifier.apply(commit("chore", true));
        assert!(!breaking.hidden);
        assert_eq!(breaking.category, Category::Breaking);
    }
}
