//! Generate command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use chronicle_changelog::{ChangelogSink, FileSink, Pipeline, StdoutSink};
use chronicle_core::ChronicleError;
use chronicle_git::GitRepo;

use crate::cli::{output, Cli, OutputFormat};

/// Generate the changelog from commit history
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Write to the changelog file (default: print to stdout)
    #[arg(short, long)]
    pub write: bool,

    /// Output file (defaults to the configured changelog file; implies --write)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep the existing file content below the new document
    #[arg(long)]
    pub prepend: bool,

    /// Template file overriding the configured template
    #[arg(short, long, value_name = "PATH")]
    pub template: Option<PathBuf>,
}

impl GenerateCommand {
    /// Execute the generate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            write = self.write,
            output = ?self.output,
            prepend = self.prepend,
            "executing generate command"
        );
        let cwd = std::env::current_dir()?;
        let (mut config, _) = cli.load_config(&cwd)?;

        if let Some(template) = &self.template {
            config.changelog.template = None;
            config.changelog.template_file = Some(template.clone());
        }

        let pipeline = Pipeline::new(&config)?;
        let repo = GitRepo::discover(&cwd).map_err(ChronicleError::from)?;
        let history = repo
            .history(config.git.tag_pattern.as_deref())
            .map_err(ChronicleError::from)?;

        if cli.format == OutputFormat::Json {
            let changelog = pipeline.build(history)?;
            println!("{}", serde_json::to_string_pretty(&changelog)?);
            return Ok(());
        }

        let target = match (&self.output, self.write) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(cwd.join(&config.changelog.file)),
            (None, false) => None,
        };

        let mut sink: Box<dyn ChangelogSink> = match &target {
            Some(path) => Box::new(
                FileSink::new(path).prepend(self.prepend || config.changelog.prepend),
            ),
            None => Box::new(StdoutSink),
        };

        let report = pipeline.run(history, sink.as_mut())?;

        if !cli.quiet {
            output::diagnostics(&report.diagnostics, cli.verbose);
            if let Some(path) = target {
                output::success(&format!(
                    "Changelog written to {} ({} release(s))",
                    output::path_style().apply_to(path.display()),
                    report.releases
                ));
            }
        }

        Ok(())
    }
}
