//! Next-version command

use clap::Args;
use tracing::info;

use chronicle_changelog::resolver::{format_tag, parse_version};
use chronicle_changelog::{suggest_next_version, Pipeline};
use chronicle_core::{ChronicleError, SemverImpact};
use chronicle_git::GitRepo;

use crate::cli::{output, Cli, OutputFormat};

/// Show the release impact and the suggested next version
#[derive(Debug, Args)]
pub struct NextVersionCommand {
    /// Version to bump from instead of the newest tag
    #[arg(long, value_name = "VERSION")]
    pub current: Option<String>,
}

/// Outcome of the calculation, as printed
#[derive(Debug, serde::Serialize)]
struct Suggestion {
    previous_tag: Option<String>,
    current: Option<String>,
    impact: SemverImpact,
    next: Option<String>,
    tag: Option<String>,
    commits: usize,
}

impl NextVersionCommand {
    /// Execute the next-version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(current = ?self.current, "executing next-version command");
        let cwd = std::env::current_dir()?;
        let (config, _) = cli.load_config(&cwd)?;

        let pipeline = Pipeline::new(&config)?;
        let repo = GitRepo::discover(&cwd).map_err(ChronicleError::from)?;
        let history = repo
            .history(config.git.tag_pattern.as_deref())
            .map_err(ChronicleError::from)?;
        let changelog = pipeline.build(history)?;

        let unreleased = changelog.releases.first().filter(|g| g.is_unreleased());
        let impact = unreleased.map(|g| g.impact).unwrap_or_default();
        let commits = unreleased.map(|g| g.commits.len()).unwrap_or_default();
        let previous_tag = changelog
            .next_release
            .as_ref()
            .and_then(|n| n.previous_tag.clone());

        let suggestion = match &self.current {
            Some(current) => {
                let current = parse_version(current).map_err(ChronicleError::from)?;
                let next = (impact != SemverImpact::None)
                    .then(|| suggest_next_version(&current, impact));
                Suggestion {
                    previous_tag,
                    current: Some(current.to_string()),
                    impact,
                    tag: next.as_ref().map(|v| format_tag(&config.git.tag_format, v)),
                    next: next.map(|v| v.to_string()),
                    commits,
                }
            }
            None => match &changelog.next_release {
                Some(next) => Suggestion {
                    previous_tag,
                    current: Some(next.previous_version.clone()),
                    impact,
                    next: Some(next.version.clone()),
                    tag: Some(next.tag.clone()),
                    commits,
                },
                None => Suggestion {
                    previous_tag,
                    current: None,
                    impact,
                    next: None,
                    tag: None,
                    commits,
                },
            },
        };

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&suggestion)?);
            }
            OutputFormat::Text => print_text(&suggestion, cli.quiet),
        }

        Ok(())
    }
}

fn print_text(suggestion: &Suggestion, quiet: bool) {
    if quiet {
        if let Some(tag) = &suggestion.tag {
            println!("{}", tag);
        }
        return;
    }

    let Some(next) = &suggestion.next else {
        output::info("No unreleased changes that require a new version");
        return;
    };

    println!("{}", output::header("Next Release"));
    println!();
    if let Some(tag) = &suggestion.previous_tag {
        println!(
            "{}",
            output::key_value("Previous tag", &output::tag_style().apply_to(tag).to_string())
        );
    }
    if let Some(current) = &suggestion.current {
        println!("{}", output::key_value("Current version", current));
    }
    println!(
        "{}",
        output::key_value("Next version", &output::version_style().apply_to(next).to_string())
    );
    if let Some(tag) = &suggestion.tag {
        println!(
            "{}",
            output::key_value("Tag", &output::tag_style().apply_to(tag).to_string())
        );
    }
    println!("{}", output::key_value("Impact", suggestion.impact.as_str()));
    println!(
        "{}",
        output::key_value("Unreleased commits", &suggestion.commits.to_string())
    );
}
