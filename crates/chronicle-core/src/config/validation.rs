//! Configuration validation
//!
//! Everything here runs once at startup. A configuration that passes is
//! never re-checked per commit.

use std::collections::{BTreeMap, HashMap};

use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::types::Category;

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_git(config)?;
    validate_changelog(config)?;
    validate_categories(config)?;
    validate_type_tables(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if !config.git.tag_format.contains("{version}") {
        return Err(
            ConfigError::invalid("git.tag_format", "must contain {version} placeholder").into(),
        );
    }

    if let Some(pattern) = &config.git.tag_pattern {
        if let Err(e) = Regex::new(pattern) {
            return Err(ConfigError::invalid("git.tag_pattern", e.to_string()).into());
        }
    }

    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    let changelog = &config.changelog;

    if changelog.unreleased_label.trim().is_empty() {
        return Err(
            ConfigError::invalid("changelog.unreleased_label", "label cannot be empty").into(),
        );
    }

    if StrftimeItems::new(&changelog.date_format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::invalid(
            "changelog.date_format",
            format!("'{}' is not a valid strftime format", changelog.date_format),
        )
        .into());
    }

    if changelog.template.is_some() && changelog.template_file.is_some() {
        return Err(ConfigError::invalid(
            "changelog.template",
            "template and template_file are mutually exclusive",
        )
        .into());
    }

    Ok(())
}

fn validate_categories(config: &Config) -> Result<()> {
    let categories = &config.changelog.categories;

    let mut seen = HashMap::new();
    for (i, category) in categories.order.iter().enumerate() {
        if let Some(first) = seen.insert(*category, i) {
            return Err(ConfigError::invalid(
                format!("changelog.categories.order[{}]", i),
                format!("'{}' already listed at position {}", category, first),
            )
            .into());
        }
    }

    let missing: Vec<&str> = Category::ALL
        .iter()
        .filter(|c| !seen.contains_key(*c))
        .map(|c| c.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::invalid(
            "changelog.categories.order",
            format!("every category needs a rank; missing: {}", missing.join(", ")),
        )
        .into());
    }

    for (key, label) in &categories.labels {
        if key.parse::<Category>().is_err() {
            return Err(ConfigError::invalid(
                format!("changelog.categories.labels.{}", key),
                "unknown category",
            )
            .into());
        }
        if label.trim().is_empty() {
            return Err(ConfigError::invalid(
                format!("changelog.categories.labels.{}", key),
                "label cannot be empty",
            )
            .into());
        }
    }

    Ok(())
}

fn validate_type_tables(config: &Config) -> Result<()> {
    check_type_keys("changelog.types", &config.changelog.types)?;
    check_type_keys("changelog.impacts", &config.changelog.impacts)?;
    Ok(())
}

/// Type lookups are case-insensitive, so keys differing only in case are
/// ambiguous.
fn check_type_keys<V>(field: &str, table: &BTreeMap<String, V>) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for key in table.keys() {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::invalid(
                format!("{}.{}", field, key),
                "commit types must be non-empty and alphanumeric",
            )
            .into());
        }
        if let Some(previous) = seen.insert(key.to_lowercase(), key) {
            return Err(ConfigError::invalid(
                format!("{}.{}", field, key),
                format!("ambiguous mapping, '{}' is already mapped", previous),
            )
            .into());
        }
    }
    Ok(())
}
