//! Init command

use std::path::PathBuf;

use clap::Args;
use dialoguer::{Confirm, Select};
use tracing::info;

use chronicle_core::config::defaults::{
    default_config_toml, DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_YAML,
};

use crate::cli::{output, Cli};

/// Initialize a new Chronicle configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Use defaults without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Write TOML instead of YAML
    #[arg(long)]
    pub toml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yes = self.yes, toml = self.toml, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_YAML));

        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                output::warning("Aborted.");
                return Ok(());
            }
        }

        let format = if self.toml {
            Format::Toml
        } else if self.yes {
            Format::Yaml
        } else {
            let formats = ["yaml", "toml"];
            let selection = Select::new()
                .with_prompt("Configuration format")
                .items(&formats)
                .default(0)
                .interact()?;
            if selection == 1 {
                Format::Toml
            } else {
                Format::Yaml
            }
        };

        let config_path = adjust_extension(config_path, format);
        std::fs::write(&config_path, render_config(format))?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
            println!();
            println!("Next steps:");
            println!("  1. Edit {} to map your commit types", config_path.display());
            println!(
                "  2. Run {} to verify your setup",
                output::path_style().apply_to("chronicle validate")
            );
            println!(
                "  3. Run {} to write the changelog",
                output::path_style().apply_to("chronicle generate --write")
            );
        }

        Ok(())
    }
}

fn adjust_extension(path: PathBuf, format: Format) -> PathBuf {
    if format == Format::Toml && path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
        path.with_extension("toml")
    } else {
        path
    }
}

fn render_config(format: Format) -> String {
    match format {
        Format::Yaml => DEFAULT_CONFIG_TEMPLATE.to_string(),
        Format::Toml => default_config_toml(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_core::config::parse_config;

    #[test]
    fn test_adjust_extension() {
        assert_eq!(
            adjust_extension(PathBuf::from("chronicle.yaml"), Format::Toml),
            PathBuf::from("chronicle.toml")
        );
        assert_eq!(
            adjust_extension(PathBuf::from("chronicle.yaml"), Format::Yaml),
            PathBuf::from("chronicle.yaml")
        );
        assert_eq!(
            adjust_extension(PathBuf::from("custom.conf"), Format::Toml),
            PathBuf::from("custom.conf")
        );
    }

    #[test]
    fn test_rendered_configs_parse() {
        let yaml = parse_config(&render_config(Format::Yaml), false).unwrap();
        let toml = parse_config(&render_config(Format::Toml), true).unwrap();
        assert_eq!(yaml.git.tag_format, toml.git.tag_format);
        assert_eq!(yaml.changelog.file, toml.changelog.file);
    }
}
