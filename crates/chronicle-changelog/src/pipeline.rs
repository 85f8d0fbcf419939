//! Pipeline coordination
//!
//! Drains a commit source, parses, classifies, groups and resolves the
//! history, renders it and hands the complete document to a sink. A failed
//! run reaches the sink as [`Delivery::Failed`] and never as a partial
//! document.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use chronicle_core::config::{validate_config, ChangelogConfig, Config};
use chronicle_core::error::{ConfigError, GitError, PipelineError};
use chronicle_core::{ChronicleError, Result, Stage};
use chronicle_git::{CommitInfo, CommitSource};

use crate::classifier::Classifier;
use crate::diagnostics::{Diagnostics, SkippedCommit};
use crate::grouper::{GroupEntry, Grouper};
use crate::parser::{CommitParser, ConventionalParser, ParseOutcome, SkipReason};
use crate::render::Renderer;
use crate::resolver::{next_release, NextRelease};
use crate::sink::{ChangelogSink, Delivery};
use crate::template::{Template, DEFAULT_TEMPLATE};
use crate::types::{ClassifiedCommit, ReleaseGroup};

/// Grouped history, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    /// Release groups, newest first
    pub releases: Vec<ReleaseGroup>,
    /// Suggested release for the unreleased commits
    pub next_release: Option<NextRelease>,
    /// What happened along the way
    pub diagnostics: Diagnostics,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Number of release groups rendered
    pub releases: usize,
    /// Size of the delivered document
    pub bytes: usize,
    /// Suggested release for the unreleased commits
    pub next_release: Option<NextRelease>,
    /// Counts and skip records
    pub diagnostics: Diagnostics,
}

/// The configured changelog engine
pub struct Pipeline {
    parser: Box<dyn CommitParser>,
    classifier: Classifier,
    grouper: Grouper,
    renderer: Renderer,
    tag_format: String,
}

/// Load the configured template source and compile it
pub fn load_template(config: &ChangelogConfig) -> std::result::Result<Template, ConfigError> {
    let source = match (&config.template, &config.template_file) {
        (Some(inline), _) => Cow::Borrowed(inline.as_str()),
        (None, Some(path)) => {
            debug!(path = %path.display(), "reading template file");
            Cow::Owned(fs::read_to_string(path)?)
        }
        (None, None) => Cow::Borrowed(DEFAULT_TEMPLATE),
    };

    Ok(Template::compile(&source)?)
}

impl Pipeline {
    /// Validate configuration and compile the template.
    ///
    /// Every configuration problem surfaces here, before any commit is read.
    #[instrument(skip(config))]
    pub fn new(config: &Config) -> Result<Self> {
        validate_config(config)?;
        let template = load_template(&config.changelog)?;
        Self::with_template(config, template)
    }

    /// Build a pipeline around an already compiled template
    pub fn with_template(config: &Config, template: Template) -> Result<Self> {
        let renderer = Renderer::new(template, &config.changelog)?;
        info!(
            types = config.changelog.types.len(),
            impacts = config.changelog.impacts.len(),
            "pipeline ready"
        );

        Ok(Self {
            parser: Box::new(ConventionalParser::new()),
            classifier: Classifier::new(&config.changelog),
            grouper: Grouper::new(config.changelog.categories.clone()),
            renderer,
            tag_format: config.git.tag_format.clone(),
        })
    }

    /// Use a custom parser
    pub fn with_parser<P: CommitParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Drain the source and group the history without rendering
    #[instrument(skip_all)]
    pub fn build<S: CommitSource>(&self, mut source: S) -> Result<Changelog> {
        info!("listing commits");
        let commits = drain(&mut source).map_err(|e| PipelineError::at(Stage::Listing, e))?;

        let mut diagnostics = Diagnostics {
            total: commits.len(),
            ..Diagnostics::default()
        };
        let commits = drop_duplicates(commits, &mut diagnostics);
        let outcomes = self.analyze(&commits);
        let mut entries = Vec::with_capacity(commits.len());

        for (raw, outcome) in commits.into_iter().zip(outcomes) {
            let commit = match outcome {
                Ok(classified) => {
                    diagnostics.parsed += 1;
                    Some(classified)
                }
                Err(reason) => {
                    debug!(hash = %raw.short_hash, %reason, "skipping commit");
                    diagnostics.skipped.push(SkippedCommit {
                        short_hash: raw.short_hash.clone(),
                        summary: raw.summary().to_string(),
                        reason,
                    });
                    None
                }
            };

            entries.push(GroupEntry {
                hash: raw.hash,
                tag: raw.tag,
                timestamp: raw.timestamp,
                commit,
            });
        }

        let grouping = self.grouper.group(entries);
        diagnostics.duplicates.extend(grouping.duplicates);

        if diagnostics.has_warnings() {
            warn!(
                skipped = diagnostics.skipped_count(),
                duplicates = diagnostics.duplicates.len(),
                dropped_tags = diagnostics.dropped_tags.len(),
                "some commits were left out of the changelog"
            );
        }

        let next_release = next_release(&grouping.groups, &self.tag_format);
        info!(
            total = diagnostics.total,
            parsed = diagnostics.parsed,
            releases = grouping.groups.len(),
            "grouped commit history"
        );

        Ok(Changelog {
            releases: grouping.groups,
            next_release,
            diagnostics,
        })
    }

    /// Render grouped history to a document
    pub fn render(&self, changelog: &Changelog) -> Result<String> {
        self.renderer
            .render(&changelog.releases, changelog.next_release.as_ref())
    }

    /// Run every stage and deliver the outcome to the sink
    #[instrument(skip_all)]
    pub fn run<S, K>(&self, source: S, sink: &mut K) -> Result<RunReport>
    where
        S: CommitSource,
        K: ChangelogSink + ?Sized,
    {
        let changelog = match self.build(source) {
            Ok(changelog) => changelog,
            Err(e) => return Err(notify_failure(sink, &Diagnostics::default(), e)),
        };

        let document = match self.render(&changelog) {
            Ok(document) => document,
            Err(e) => {
                let e = PipelineError::at(Stage::Rendering, e).into();
                return Err(notify_failure(sink, &changelog.diagnostics, e));
            }
        };

        sink.deliver(Delivery::Complete {
            document: &document,
            diagnostics: &changelog.diagnostics,
        })
        .map_err(|e| PipelineError::at(Stage::Writing, e))?;

        info!(
            releases = changelog.releases.len(),
            bytes = document.len(),
            "changelog delivered"
        );

        Ok(RunReport {
            releases: changelog.releases.len(),
            bytes: document.len(),
            next_release: changelog.next_release,
            diagnostics: changelog.diagnostics,
        })
    }

    fn analyze_one(&self, commit: &CommitInfo) -> std::result::Result<ClassifiedCommit, SkipReason> {
        match self.parser.parse(commit) {
            ParseOutcome::Parsed(parsed) => Ok(self.classifier.apply(parsed)),
            ParseOutcome::Skip(reason) => Err(reason),
        }
    }

    /// Parse and classify, keeping input order
    #[cfg(not(feature = "parallel"))]
    fn analyze(&self, commits: &[CommitInfo]) -> Vec<std::result::Result<ClassifiedCommit, SkipReason>> {
        commits.iter().map(|c| self.analyze_one(c)).collect()
    }

    /// Parse and classify on the rayon pool, keeping input order
    #[cfg(feature = "parallel")]
    fn analyze(&self, commits: &[CommitInfo]) -> Vec<std::result::Result<ClassifiedCommit, SkipReason>> {
        use rayon::prelude::*;

        commits.par_iter().map(|c| self.analyze_one(c)).collect()
    }
}

fn drain<S: CommitSource>(source: &mut S) -> std::result::Result<Vec<CommitInfo>, GitError> {
    let mut commits = Vec::with_capacity(source.size_hint().unwrap_or_default());
    while let Some(commit) = source.next_commit()? {
        commits.push(commit);
    }
    debug!(count = commits.len(), "drained commit source");
    Ok(commits)
}

/// Keep the first occurrence of every hash; repeats never reach the parser
fn drop_duplicates(commits: Vec<CommitInfo>, diagnostics: &mut Diagnostics) -> Vec<CommitInfo> {
    let mut seen = HashSet::with_capacity(commits.len());
    let mut kept = Vec::with_capacity(commits.len());

    for commit in commits {
        if seen.insert(commit.hash.clone()) {
            kept.push(commit);
            continue;
        }

        match &commit.tag {
            Some(tag) => {
                warn!(hash = %commit.short_hash, %tag, "dropping duplicate commit and its tag");
                diagnostics.dropped_tags.push(tag.clone());
            }
            None => debug!(hash = %commit.short_hash, "dropping duplicate commit"),
        }
        diagnostics.duplicates.push(commit.hash);
    }
    kept
}

/// Tell the sink the run failed, then hand the error back
fn notify_failure<K: ChangelogSink + ?Sized>(
    sink: &mut K,
    diagnostics: &Diagnostics,
    error: ChronicleError,
) -> ChronicleError {
    let stage = match &error {
        ChronicleError::Pipeline(e) => e.stage(),
        _ => Stage::Listing,
    };
    let message = error.to_string();

    if let Err(e) = sink.deliver(Delivery::Failed {
        stage,
        message: &message,
        diagnostics,
    }) {
        warn!(error = %e, "sink rejected failure notice");
    }
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chronicle_git::VecSource;

    use crate::sink::MemorySink;

    fn commit(hash: &str, message: &str) -> CommitInfo {
        CommitInfo::new(hash, message, "Test", "test@example.com", Utc::now())
    }

    struct FailingSource;

    impl CommitSource for FailingSource {
        fn next_commit(&mut self) -> chronicle_git::Result<Option<CommitInfo>> {
            Err(GitError::SourceFailed("disk on fire".to_string()))
        }
    }

    struct RejectingSink;

    impl ChangelogSink for RejectingSink {
        fn deliver(&mut self, delivery: Delivery<'_>) -> Result<()> {
            match delivery {
                Delivery::Complete { .. } => Err(chronicle_core::error::ChangelogError::SinkRejected(
                    "read-only".to_string(),
                )
                .into()),
                Delivery::Failed { .. } => Ok(()),
            }
        }
    }

    #[test]
    fn test_new_rejects_bad_template() {
        let mut config = Config::default();
        config.changelog.template = Some("{{#each releases}}{{nope}}{{/each}}".to_string());

        let err = Pipeline::new(&config).err().unwrap();
        assert!(err.is_config());
        assert!(err.to_string().contains("unknown placeholder 'nope'"));
    }

    #[test]
    fn test_new_reads_template_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("tpl.md");
        std::fs::write(&path, "{{#each releases}}{{version}}\n{{/each}}").unwrap();

        let mut config = Config::default();
        config.changelog.template_file = Some(path);
        let pipeline = Pipeline::new(&config).unwrap();

        let mut sink = MemorySink::new();
        pipeline
            .run(VecSource::new(vec![commit("a1", "feat: x")]), &mut sink)
            .unwrap();
        assert_eq!(sink.document.as_deref(), Some("Unreleased\n"));
    }

    #[test]
    fn test_missing_template_file_is_config_error() {
        let mut config = Config::default();
        config.changelog.template_file = Some("/definitely/not/here.tpl".into());

        let err = Pipeline::new(&config).err().unwrap();
        assert!(err.is_config());
    }

    #[test]
    fn test_source_failure_reaches_sink() {
        let pipeline = Pipeline::new(&Config::default()).unwrap();
        let mut sink = MemorySink::new();

        let err = pipeline.run(FailingSource, &mut sink).unwrap_err();

        assert!(matches!(
            &err,
            ChronicleError::Pipeline(e) if e.stage() == Stage::Listing
        ));
        assert!(sink.document.is_none());
        let (stage, message) = sink.failure.unwrap();
        assert_eq!(stage, Stage::Listing);
        assert!(message.contains("disk on fire"));
    }

    #[test]
    fn test_sink_failure_is_writing_stage() {
        let pipeline = Pipeline::new(&Config::default()).unwrap();
        let err = pipeline
            .run(VecSource::new(vec![commit("a1", "fix: y")]), &mut RejectingSink)
            .unwrap_err();

        assert!(matches!(
            err,
            ChronicleError::Pipeline(ref e) if e.stage() == Stage::Writing
        ));
    }

    #[test]
    fn test_custom_parser() {
        struct EverythingIsAFix;

        impl CommitParser for EverythingIsAFix {
            fn parse(&self, commit: &CommitInfo) -> ParseOutcome {
                ConventionalParser::new().parse(&CommitInfo::new(
                    commit.hash.clone(),
                    format!("fix: {}", commit.summary()),
                    commit.author.clone(),
                    commit.author_email.clone(),
                    commit.timestamp,
                ))
            }
        }

        let pipeline = Pipeline::new(&Config::default())
            .unwrap()
            .with_parser(EverythingIsAFix);
        let changelog = pipeline
            .build(VecSource::new(vec![commit("a1", "tidy things")]))
            .unwrap();

        assert_eq!(changelog.diagnostics.parsed, 1);
        assert_eq!(
            changelog.releases[0].buckets[0].commits[0].commit.subject,
            "tidy things"
        );
    }
}
