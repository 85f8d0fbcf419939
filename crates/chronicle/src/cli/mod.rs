//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

use chronicle_core::config::{load_config, load_config_or_default, Config};
use chronicle_core::ChronicleError;

use commands::{GenerateCommand, InitCommand, NextVersionCommand, ValidateCommand};

/// Chronicle - changelogs from conventional commits
#[derive(Debug, Parser)]
#[command(name = "chronicle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: searched upwards from the working directory)
    #[arg(long, global = true, env = "CHRONICLE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the changelog from commit history
    Generate(GenerateCommand),

    /// Show the release impact and the suggested next version
    NextVersion(NextVersionCommand),

    /// Validate configuration and template
    Validate(ValidateCommand),

    /// Initialize a new Chronicle configuration
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Generate(ref cmd) => cmd.execute(&self),
            Commands::NextVersion(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
            Commands::Init(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load the configuration named by `--config`, or search for one
    pub fn load_config(&self, cwd: &Path) -> Result<(Config, Option<PathBuf>), ChronicleError> {
        let (mut config, path) = match &self.config {
            Some(path) => (load_config(path)?, Some(path.clone())),
            None => load_config_or_default(cwd)?,
        };

        if let Some(dir) = path.as_deref().and_then(Path::parent) {
            resolve_template_path(&mut config, dir);
        }
        Ok((config, path))
    }
}

/// Relative template paths are read from the config file's directory
fn resolve_template_path(config: &mut Config, config_dir: &Path) {
    if let Some(file) = config.changelog.template_file.as_mut() {
        if file.is_relative() {
            *file = config_dir.join(&*file);
            debug!(path = %file.display(), "resolved template file");
        }
    }
}
