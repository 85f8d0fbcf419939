//! Validate command

use clap::Args;
use console::style;
use tracing::info;

use chronicle_changelog::Pipeline;
use chronicle_git::GitRepo;

use crate::cli::{output, Cli, OutputFormat};
use crate::exit_codes;

/// Validate configuration and template
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Only validate configuration, skip the repository check
    #[arg(long)]
    pub config_only: bool,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            config_only = self.config_only,
            strict = self.strict,
            "executing validate command"
        );
        let cwd = std::env::current_dir()?;

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        let (config, config_path) = match cli.load_config(&cwd) {
            Ok((config, path)) => (Some(config), path),
            Err(e) => {
                errors.push(format!("Configuration: {}", e));
                (None, None)
            }
        };

        if let Some(ref cfg) = config {
            if config_path.is_none() {
                warnings.push("No configuration file found, using defaults".to_string());
            }

            // Template compilation and date format checks happen here
            if let Err(e) = Pipeline::new(cfg) {
                errors.push(format!("Pipeline: {}", e));
            }

            if !self.config_only {
                match GitRepo::discover(&cwd) {
                    Ok(repo) => {
                        if let Err(e) = repo.tag_index(cfg.git.tag_pattern.as_deref()) {
                            errors.push(format!("Tags: {}", e));
                        }
                    }
                    Err(e) => {
                        warnings.push(format!("Git repository: {}", e));
                    }
                }
            }
        }

        if self.strict {
            errors.append(&mut warnings);
        }

        let passed = errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.map(|p| p.to_string_lossy().to_string()),
                    "errors": errors,
                    "warnings": warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header("Validation Results"));
                    println!();

                    if let Some(path) = config_path {
                        println!("Config: {}", output::path_style().apply_to(path.display()));
                        println!();
                    }

                    if !errors.is_empty() {
                        println!("{}", style("Errors:").red().bold());
                        for error in &errors {
                            println!("  {} {}", style("✗").red(), error);
                        }
                        println!();
                    }

                    if !warnings.is_empty() {
                        println!("{}", style("Warnings:").yellow().bold());
                        for warning in &warnings {
                            println!("  {} {}", style("!").yellow(), warning);
                        }
                        println!();
                    }

                    if passed {
                        if warnings.is_empty() {
                            output::success("All checks passed");
                        } else {
                            output::success(&format!(
                                "Validation passed with {} warning(s)",
                                warnings.len()
                            ));
                        }
                    } else {
                        output::error(&format!(
                            "Validation failed with {} error(s)",
                            errors.len()
                        ));
                    }
                }
            }
        }

        if !passed {
            std::process::exit(exit_codes::VALIDATION_ERROR);
        }

        Ok(())
    }
}
