//! Changelog rendering
//!
//! Turns release groups into the template data model and renders it.

use chrono::format::{Item, StrftimeItems};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use chronicle_core::config::ChangelogConfig;
use chronicle_core::error::{ChangelogError, ConfigError};
use chronicle_core::Result;

use crate::resolver::NextRelease;
use crate::template::Template;
use crate::types::{CategoryBucket, ClassifiedCommit, ReleaseGroup};

#[derive(Serialize)]
struct DocumentView<'a> {
    releases: Vec<ReleaseView<'a>>,
}

#[derive(Serialize)]
struct ReleaseView<'a> {
    version: &'a str,
    tag: Option<&'a str>,
    date: Option<String>,
    bump: &'static str,
    next_version: Option<&'a str>,
    unreleased: bool,
    commit_count: usize,
    categories: Vec<CategoryView<'a>>,
}

#[derive(Serialize)]
struct CategoryView<'a> {
    label: &'a str,
    category: &'static str,
    count: usize,
    commits: Vec<CommitView<'a>>,
}

#[derive(Serialize)]
struct CommitView<'a> {
    subject: &'a str,
    raw_subject: &'a str,
    scope: Option<&'a str>,
    hash: &'a str,
    full_hash: &'a str,
    #[serde(rename = "type")]
    commit_type: &'a str,
    author: &'a str,
    body: Option<&'a str>,
    breaking: bool,
    breaking_description: Option<&'a str>,
}

impl<'a> From<&'a ClassifiedCommit> for CommitView<'a> {
    fn from(classified: &'a ClassifiedCommit) -> Self {
        let commit = &classified.commit;
        Self {
            subject: commit.display_subject(),
            raw_subject: &commit.subject,
            scope: commit.scope.as_deref(),
            hash: &commit.short_hash,
            full_hash: &commit.hash,
            commit_type: &commit.commit_type,
            author: &commit.author,
            body: commit.body.as_deref(),
            breaking: commit.breaking,
            breaking_description: commit.breaking_description(),
        }
    }
}

/// Renders release groups through a compiled template
#[derive(Debug, Clone)]
pub struct Renderer {
    template: Template,
    unreleased_label: String,
    date_format: String,
    cluster_scopes: bool,
}

impl Renderer {
    /// Create a renderer with display settings from configuration
    pub fn new(template: Template, config: &ChangelogConfig) -> std::result::Result<Self, ConfigError> {
        if StrftimeItems::new(&config.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::invalid(
                "changelog.date_format",
                format!("'{}' is not a valid date format", config.date_format),
            ));
        }

        Ok(Self {
            template,
            unreleased_label: config.unreleased_label.clone(),
            date_format: config.date_format.clone(),
            cluster_scopes: config.cluster_scopes,
        })
    }

    /// The template data model for the given releases
    pub fn context(&self, groups: &[ReleaseGroup], next: Option<&NextRelease>) -> Result<Value> {
        let document = DocumentView {
            releases: groups.iter().map(|g| self.release_view(g, next)).collect(),
        };
        Ok(serde_json::to_value(document)?)
    }

    /// Render the full document
    #[instrument(skip_all, fields(releases = groups.len()))]
    pub fn render(&self, groups: &[ReleaseGroup], next: Option<&NextRelease>) -> Result<String> {
        let context = self.context(groups, next)?;
        let document = self
            .template
            .render(&context)
            .map_err(|e| ChangelogError::RenderFailed(e.to_string()))?;
        debug!(bytes = document.len(), "rendered changelog");
        Ok(document)
    }

    fn release_view<'a>(
        &'a self,
        group: &'a ReleaseGroup,
        next: Option<&'a NextRelease>,
    ) -> ReleaseView<'a> {
        ReleaseView {
            version: group.name.as_deref().unwrap_or(&self.unreleased_label),
            tag: group.name.as_deref(),
            date: group
                .date
                .map(|d| d.format(&self.date_format).to_string()),
            bump: group.impact.as_str(),
            next_version: next
                .filter(|_| group.is_unreleased())
                .map(|n| n.tag.as_str()),
            unreleased: group.is_unreleased(),
            commit_count: group.visible_count(),
            categories: group
                .buckets
                .iter()
                .map(|b| self.category_view(b))
                .collect(),
        }
    }

    fn category_view<'a>(&self, bucket: &'a CategoryBucket) -> CategoryView<'a> {
        let commits = if self.cluster_scopes {
            cluster_by_scope(&bucket.commits)
        } else {
            bucket.commits.iter().collect()
        };

        CategoryView {
            label: &bucket.label,
            category: bucket.category.as_str(),
            count: commits.len(),
            commits: commits.into_iter().map(CommitView::from).collect(),
        }
    }
}

/// Stable clustering by scope, clusters in order of first appearance
fn cluster_by_scope(commits: &[ClassifiedCommit]) -> Vec<&ClassifiedCommit> {
    let mut scopes: Vec<Option<&str>> = Vec::new();
    for commit in commits {
        let scope = commit.commit.scope.as_deref();
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }
    }

    scopes
        .into_iter()
        .flat_map(|scope| {
            commits
                .iter()
                .filter(move |c| c.commit.scope.as_deref() == scope)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chronicle_core::{Category, SemverImpact};

    use crate::template::DEFAULT_TEMPLATE;
    use crate::types::ParsedCommit;

    fn classified(hash: &str, scope: Option<&str>, subject: &str) -> ClassifiedCommit {
        ClassifiedCommit {
            commit: ParsedCommit {
                hash: format!("{hash}000000000"),
                short_hash: format!("{hash}000"),
                commit_type: "feat".to_string(),
                scope: scope.map(str::to_string),
                breaking: false,
                subject: subject.to_string(),
                body: None,
                footers: Vec::new(),
                author: "Test".to_string(),
                timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            },
            category: Category::Features,
            impact: SemverImpact::Minor,
            hidden: false,
        }
    }

    fn release(name: Option<&str>, commits: Vec<ClassifiedCommit>) -> ReleaseGroup {
        ReleaseGroup {
            name: name.map(str::to_string),
            date: name.map(|_| Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            impact: SemverImpact::Minor,
            buckets: vec![CategoryBucket {
                category: Category::Features,
                label: "Features".to_string(),
                commits: commits.clone(),
            }],
            commits,
        }
    }

    fn renderer(config: &ChangelogConfig) -> Renderer {
        Renderer::new(Template::compile(DEFAULT_TEMPLATE).unwrap(), config).unwrap()
    }

    #[test]
    fn test_render_default_markdown() {
        let groups = vec![
            release(None, vec![classified("aaaa", Some("api"), "✨ add search")]),
            release(Some("v1.0.0"), vec![classified("bbbb", None, "first")]),
        ];

        let output = renderer(&ChangelogConfig::default())
            .render(&groups, None)
            .unwrap();

        assert_eq!(
            output,
            "# Changelog\n\
             \n\
             ## Unreleased\n\
             \n\
             ### Features\n\
             \n\
             - **api:** add search (aaaa000)\n\
             \n\
             ## v1.0.0 (2024-03-01)\n\
             \n\
             ### Features\n\
             \n\
             - first (bbbb000)\n"
        );
    }

    #[test]
    fn test_context_fields() {
        let groups = vec![release(None, vec![classified("aaaa", None, "x")])];
        let next = NextRelease {
            previous_tag: None,
            previous_version: "0.0.0".to_string(),
            impact: SemverImpact::Minor,
            version: "0.1.0".to_string(),
            tag: "v0.1.0".to_string(),
        };

        let mut config = ChangelogConfig::default();
        config.unreleased_label = "Next".to_string();
        let context = renderer(&config).context(&groups, Some(&next)).unwrap();

        let release = &context["releases"][0];
        assert_eq!(release["version"], "Next");
        assert_eq!(release["tag"], Value::Null);
        assert_eq!(release["bump"], "minor");
        assert_eq!(release["next_version"], "v0.1.0");
        assert_eq!(release["unreleased"], true);
        assert_eq!(release["commit_count"], 1);
        assert_eq!(release["categories"][0]["category"], "features");
        assert_eq!(release["categories"][0]["commits"][0]["type"], "feat");
        assert_eq!(release["categories"][0]["commits"][0]["full_hash"], "aaaa000000000");
    }

    #[test]
    fn test_cluster_scopes() {
        let commits = vec![
            classified("a", Some("ui"), "one"),
            classified("b", Some("api"), "two"),
            classified("c", None, "three"),
            classified("d", Some("ui"), "four"),
            classified("e", Some("api"), "five"),
        ];

        let clustered: Vec<_> = cluster_by_scope(&commits)
            .into_iter()
            .map(|c| c.commit.subject.as_str())
            .collect();
        assert_eq!(clustered, vec!["one", "four", "two", "five", "three"]);

        let mut config = ChangelogConfig::default();
        config.cluster_scopes = true;
        let context = renderer(&config)
            .context(&[release(None, commits)], None)
            .unwrap();
        assert_eq!(
            context["releases"][0]["categories"][0]["commits"][1]["subject"],
            "four"
        );
    }

    #[test]
    fn test_invalid_date_format() {
        let mut config = ChangelogConfig::default();
        config.date_format = "%Q".to_string();
        assert!(Renderer::new(Template::compile(DEFAULT_TEMPLATE).unwrap(), &config).is_err());
    }
}
