//! Changelog sinks
//!
//! A sink receives exactly one delivery per run: the complete document, or a
//! failure notice carrying no document at all.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

use chronicle_core::error::ChangelogError;
use chronicle_core::{Result, Stage};

use crate::diagnostics::Diagnostics;

/// The outcome of a run, handed to the sink
#[derive(Debug, Clone, Copy)]
pub enum Delivery<'a> {
    /// Every stage succeeded
    Complete {
        document: &'a str,
        diagnostics: &'a Diagnostics,
    },
    /// A stage failed; nothing should be written
    Failed {
        stage: Stage,
        message: &'a str,
        diagnostics: &'a Diagnostics,
    },
}

/// Destination for a rendered changelog
pub trait ChangelogSink {
    /// Accept the outcome of a run
    fn deliver(&mut self, delivery: Delivery<'_>) -> Result<()>;
}

impl<K: ChangelogSink + ?Sized> ChangelogSink for &mut K {
    fn deliver(&mut self, delivery: Delivery<'_>) -> Result<()> {
        (**self).deliver(delivery)
    }
}

/// Keeps the delivery in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// The rendered document, after a complete run
    pub document: Option<String>,
    /// Failed stage and message, after a failed run
    pub failure: Option<(Stage, String)>,
    /// Diagnostics of the last delivery
    pub diagnostics: Option<Diagnostics>,
    /// Number of deliveries received
    pub deliveries: usize,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChangelogSink for MemorySink {
    fn deliver(&mut self, delivery: Delivery<'_>) -> Result<()> {
        self.deliveries += 1;
        match delivery {
            Delivery::Complete {
                document,
                diagnostics,
            } => {
                self.document = Some(document.to_string());
                self.diagnostics = Some(diagnostics.clone());
            }
            Delivery::Failed {
                stage,
                message,
                diagnostics,
            } => {
                self.failure = Some((stage, message.to_string()));
                self.diagnostics = Some(diagnostics.clone());
            }
        }
        Ok(())
    }
}

/// Prints the document to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ChangelogSink for StdoutSink {
    fn deliver(&mut self, delivery: Delivery<'_>) -> Result<()> {
        if let Delivery::Complete { document, .. } = delivery {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(ChangelogError::Io)?;
        }
        Ok(())
    }
}

/// Writes the document to a file, replacing it atomically
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    prepend: bool,
}

impl FileSink {
    /// Replace the file with each document
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            prepend: false,
        }
    }

    /// Put the document in front of the existing file content
    pub fn prepend(mut self, prepend: bool) -> Self {
        self.prepend = prepend;
        self
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_failed(&self, source: io::Error) -> ChangelogError {
        ChangelogError::WriteFailed {
            path: self.path.clone(),
            source,
        }
    }

    #[instrument(skip(self, document), fields(path = %self.path.display(), prepend = self.prepend))]
    fn write(&self, document: &str) -> std::result::Result<(), ChangelogError> {
        let content = if self.prepend && self.path.exists() {
            let existing = fs::read_to_string(&self.path).map_err(|e| self.write_failed(e))?;
            format!("{}\n{}", document, existing)
        } else {
            document.to_string()
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.write_failed(e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| self.write_failed(e))?;
        temp.persist(&self.path)
            .map_err(|e| self.write_failed(e.error))?;

        info!(bytes = content.len(), "wrote changelog");
        Ok(())
    }
}

impl ChangelogSink for FileSink {
    fn deliver(&mut self, delivery: Delivery<'_>) -> Result<()> {
        match delivery {
            Delivery::Complete { document, .. } => self.write(document)?,
            Delivery::Failed { stage, message, .. } => {
                warn!(path = %self.path.display(), %stage, reason = message, "not writing changelog");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn complete<'a>(document: &'a str, diagnostics: &'a Diagnostics) -> Delivery<'a> {
        Delivery::Complete {
            document,
            diagnostics,
        }
    }

    #[test]
    fn test_memory_sink_records_failure() {
        let diagnostics = Diagnostics::default();
        let mut sink = MemorySink::new();
        sink.deliver(Delivery::Failed {
            stage: Stage::Listing,
            message: "boom",
            diagnostics: &diagnostics,
        })
        .unwrap();

        assert!(sink.document.is_none());
        assert_eq!(sink.failure, Some((Stage::Listing, "boom".to_string())));
        assert_eq!(sink.deliveries, 1);
    }

    #[test]
    fn test_file_sink_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("CHANGELOG.md");
        std::fs::write(&path, "old\n").unwrap();

        let diagnostics = Diagnostics::default();
        FileSink::new(&path)
            .deliver(complete("new\n", &diagnostics))
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_file_sink_prepends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("CHANGELOG.md");
        std::fs::write(&path, "## v1.0.0\n").unwrap();

        let diagnostics = Diagnostics::default();
        FileSink::new(&path)
            .prepend(true)
            .deliver(complete("## v1.1.0\n", &diagnostics))
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "## v1.1.0\n\n## v1.0.0\n"
        );
    }

    #[test]
    fn test_file_sink_prepend_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("CHANGELOG.md");

        let diagnostics = Diagnostics::default();
        FileSink::new(&path)
            .prepend(true)
            .deliver(complete("doc\n", &diagnostics))
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "doc\n");
    }

    #[test]
    fn test_file_sink_ignores_failed_run() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("CHANGELOG.md");
        std::fs::write(&path, "keep\n").unwrap();

        let diagnostics = Diagnostics::default();
        FileSink::new(&path)
            .deliver(Delivery::Failed {
                stage: Stage::Rendering,
                message: "bad",
                diagnostics: &diagnostics,
            })
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep\n");
    }

    #[test]
    fn test_file_sink_missing_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("CHANGELOG.md");

        let diagnostics = Diagnostics::default();
        let result = FileSink::new(&path).deliver(complete("doc\n", &diagnostics));
        assert!(result.is_err());
    }
}
