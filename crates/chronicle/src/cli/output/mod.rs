//! Output formatting utilities

use console::{style, Style};

use chronicle_changelog::Diagnostics;

/// Print a success message
pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    eprintln!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for version numbers
pub fn version_style() -> Style {
    Style::new().green().bold()
}

/// Style for tags
pub fn tag_style() -> Style {
    Style::new().yellow()
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Report commits that were left out of the changelog.
///
/// Goes to stderr so a document printed on stdout stays clean.
pub fn diagnostics(diagnostics: &Diagnostics, verbose: bool) {
    if !diagnostics.has_warnings() {
        return;
    }

    if diagnostics.skipped_count() > 0 {
        warning(&format!(
            "{} of {} commit(s) skipped as non-conventional",
            diagnostics.skipped_count(),
            diagnostics.total
        ));
    }
    if !diagnostics.duplicates.is_empty() {
        warning(&format!(
            "{} duplicate commit(s) ignored",
            diagnostics.duplicates.len()
        ));
    }
    for tag in &diagnostics.dropped_tags {
        warning(&format!(
            "tag {} sits on a duplicate commit and was ignored",
            tag_style().apply_to(tag)
        ));
    }

    if verbose {
        for skipped in &diagnostics.skipped {
            eprintln!(
                "    {} {} ({})",
                tag_style().apply_to(&skipped.short_hash),
                skipped.summary,
                style(skipped.reason.as_str()).dim()
            );
        }
    }
}
