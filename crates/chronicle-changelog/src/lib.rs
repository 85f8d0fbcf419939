//! Chronicle Changelog - conventional-commit changelog engine
//!
//! Raw commits flow one way through this crate: they are parsed against the
//! conventional-commit grammar, classified into a category and a semver
//! impact, grouped by release tag, resolved to a version bump and rendered
//! through a template. [`Pipeline`] wires the stages over a
//! [`CommitSource`](chronicle_git::CommitSource) and a [`ChangelogSink`].

pub mod classifier;
pub mod diagnostics;
pub mod grouper;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod sink;
pub mod template;
pub mod types;

pub use classifier::Classifier;
pub use diagnostics::{Diagnostics, SkippedCommit};
pub use grouper::{GroupEntry, Grouper, Grouping};
pub use parser::{CommitParser, ConventionalParser, ParseOutcome, SkipReason};
pub use pipeline::{Changelog, Pipeline, RunReport};
pub use render::Renderer;
pub use resolver::{next_release, resolve, suggest_next_version, NextRelease};
pub use sink::{ChangelogSink, Delivery, FileSink, MemorySink, StdoutSink};
pub use template::{Template, DEFAULT_TEMPLATE};
pub use types::{CategoryBucket, ClassifiedCommit, Footer, ParsedCommit, ReleaseGroup};
