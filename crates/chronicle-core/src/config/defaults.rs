//! Default configuration values

use super::types::Config;

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "chronicle.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "chronicle.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".chronicle.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".chronicle.toml",
    ]
}

/// Generate default configuration as TOML
pub fn default_config_toml() -> String {
    let config = Config::default();
    toml::to_string_pretty(&config).unwrap_or_default()
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Chronicle Configuration

git:
  # Only tags matching this pattern mark release boundaries
  # tag_pattern: "^v\\d+\\.\\d+\\.\\d+"
  tag_format: "v{version}"

changelog:
  file: CHANGELOG.md
  prepend: false
  unreleased_label: Unreleased
  date_format: "%Y-%m-%d"
  cluster_scopes: false
  types:
    feat: { category: features }
    fix: { category: bug_fixes }
    perf: { category: performance }
    refactor: { category: refactor }
    docs: { category: documentation }
    style: { category: styling }
    test: { category: testing }
    build: { category: build }
    ci: { category: ci }
    chore: { category: chore }
    revert: { category: revert }
  impacts:
    feat: minor
    fix: patch
  categories:
    order:
      - breaking
      - features
      - bug_fixes
      - performance
      - refactor
      - documentation
      - styling
      - testing
      - build
      - ci
      - chore
      - revert
      - other
"#;
