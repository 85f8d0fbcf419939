//! Error types for Chronicle

use std::path::PathBuf;
use thiserror::Error;

use crate::types::Stage;

/// Result type alias using ChronicleError
pub type Result<T> = std::result::Result<T, ChronicleError>;

/// Main error type for Chronicle operations
#[derive(Debug, Error)]
pub enum ChronicleError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Pipeline stage failures
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// The changelog template is invalid
    #[error("Invalid changelog template: {0}")]
    Template(#[from] TemplateError),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Shorthand for an invalid value in a named field
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Template compilation errors, reported before any commit is processed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The template is not valid handlebars
    #[error("{0}")]
    Syntax(String),

    /// A name not available in the scope where it is used
    #[error("line {line}: unknown placeholder '{name}' in {scope} scope")]
    UnknownPlaceholder {
        name: String,
        scope: String,
        line: usize,
    },

    /// A list or an item used as a plain variable
    #[error("line {line}: '{name}' is not a value; iterate it with {{{{#each}}}}")]
    NotAValue { name: String, line: usize },

    /// `{{#each}}` over something that is not a list
    #[error("line {line}: '{name}' is not a list")]
    NotAList { name: String, line: usize },

    /// A helper other than `each`, `if` and `unless`
    #[error("line {line}: unknown helper '{name}'")]
    UnknownHelper { name: String, line: usize },

    /// Partials and decorators
    #[error("line {line}: partials and decorators are not supported")]
    Unsupported { line: usize },
}

/// Git and commit-source errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Tag pattern is not a valid regular expression
    #[error("Invalid tag pattern '{pattern}': {reason}")]
    InvalidTagPattern { pattern: String, reason: String },

    /// The commit source could not supply commits
    #[error("Commit source failed: {0}")]
    SourceFailed(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),

    /// Semver error
    #[error("Semver error: {0}")]
    Semver(#[from] semver::Error),
}

/// Changelog output errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// The sink refused the document
    #[error("Sink rejected the changelog: {0}")]
    SinkRejected(String),

    /// The template failed against the release data
    #[error("Failed to render changelog: {0}")]
    RenderFailed(String),

    /// Failed to write changelog
    #[error("Failed to write changelog to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failure attributed to one pipeline stage
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage could not complete
    #[error("{stage} stage failed: {source}")]
    StageFailed {
        stage: Stage,
        #[source]
        source: Box<ChronicleError>,
    },
}

impl PipelineError {
    /// Wrap an error with the stage it occurred in
    pub fn at(stage: Stage, source: impl Into<ChronicleError>) -> Self {
        Self::StageFailed {
            stage,
            source: Box::new(source.into()),
        }
    }

    /// Stage the failure occurred in
    pub fn stage(&self) -> Stage {
        match self {
            Self::StageFailed { stage, .. } => *stage,
        }
    }
}

impl ChronicleError {
    /// Whether this error stems from configuration, directly or via a stage
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) | Self::Toml(_) => true,
            Self::Pipeline(PipelineError::StageFailed { source, .. }) => source.is_config(),
            _ => false,
        }
    }
}
