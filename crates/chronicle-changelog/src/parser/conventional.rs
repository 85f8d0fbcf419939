//! Conventional Commits parser
//!
//! Parses commits following the Conventional Commits format:
//! https://www.conventionalcommits.org/

use regex::Regex;
use std::sync::LazyLock;

use super::{CommitParser, ParseOutcome, SkipReason};
use crate::types::{Footer, ParsedCommit};
use chronicle_git::CommitInfo;

/// Regex for the header line: `type(scope)!: subject`
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[A-Za-z0-9]+)(?:\((?P<scope>[^()]*)\))?(?P<breaking>!)?:(?:\s+(?P<subject>.*))?$",
    )
    .expect("Invalid regex")
});

/// Regex for the first line of a footer
static FOOTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<token>BREAKING[ -]CHANGE|[A-Za-z][A-Za-z0-9-]*)(?::(?:\s+|$)| #)(?P<value>.*)$",
    )
    .expect("Invalid regex")
});

/// Gitmoji shortcode such as `:sparkles:`
static SHORTCODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:[a-z0-9_+-]+:").expect("Invalid regex"));

/// Parser for Conventional Commits format
#[derive(Debug, Default, Clone, Copy)]
pub struct ConventionalParser;

impl ConventionalParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a commit message
    fn parse_message(&self, message: &str) -> Result<ParsedMessage, SkipReason> {
        let message = message.trim_start();
        if message.trim_end().is_empty() {
            return Err(SkipReason::EmptyMessage);
        }

        let mut lines = message.lines();
        let header = lines.next().unwrap_or_default().trim();
        let caps = HEADER_REGEX
            .captures(header)
            .ok_or(SkipReason::MalformedHeader)?;

        let commit_type = caps["type"].to_lowercase();
        let scope = match caps.name("scope") {
            Some(m) if m.as_str().trim().is_empty() => return Err(SkipReason::MalformedHeader),
            Some(m) => Some(m.as_str().trim().to_string()),
            None => None,
        };
        let subject = caps.name("subject").map_or("", |m| m.as_str().trim());
        if subject.is_empty() {
            return Err(SkipReason::EmptySubject);
        }

        let rest: Vec<&str> = lines.collect();
        let (body, footers) = split_body(&rest);
        let breaking = caps.name("breaking").is_some() || footers.iter().any(Footer::is_breaking);

        Ok(ParsedMessage {
            commit_type,
            scope,
            breaking,
            subject: subject.to_string(),
            body,
            footers,
        })
    }
}

struct ParsedMessage {
    commit_type: String,
    scope: Option<String>,
    breaking: bool,
    subject: String,
    body: Option<String>,
    footers: Vec<Footer>,
}

/// Split the lines after the header into body and footers.
///
/// Footers are the trailing paragraph, and only when its first line reads
/// as a footer. Anything else is body text.
fn split_body(lines: &[&str]) -> (Option<String>, Vec<Footer>) {
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return (None, Vec::new());
    };
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start + 1, |i| i + 1);
    let lines = &lines[start..end];

    let last_paragraph = lines
        .iter()
        .rposition(|l| l.trim().is_empty())
        .map_or(0, |i| i + 1);

    let (body_lines, footer_lines) = if FOOTER_REGEX.is_match(lines[last_paragraph].trim_end()) {
        lines.split_at(last_paragraph)
    } else {
        (lines, &[][..])
    };

    let body = body_lines
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    let body = body.trim_end();
    let body = (!body.is_empty()).then(|| body.to_string());

    (body, parse_footers(footer_lines))
}

fn parse_footers(lines: &[&str]) -> Vec<Footer> {
    let mut footers: Vec<Footer> = Vec::new();

    for line in lines {
        let line = line.trim_end();
        if let Some(caps) = FOOTER_REGEX.captures(line) {
            footers.push(Footer::new(&caps["token"], caps["value"].trim()));
        } else if let Some(last) = footers.last_mut() {
            // Continuation of previous footer
            if !last.value.is_empty() {
                last.value.push('\n');
            }
            last.value.push_str(line.trim());
        }
    }

    footers
}

fn is_decoration(c: char) -> bool {
    c.is_whitespace() || (!c.is_ascii() && !c.is_alphanumeric())
}

/// Strip leading emoji, symbols and gitmoji shortcodes from a subject.
///
/// Returns the original subject when stripping would leave nothing.
pub(crate) fn strip_decorations(subject: &str) -> &str {
    let mut rest = subject;
    loop {
        let trimmed = rest.trim_start_matches(is_decoration);
        let trimmed = match SHORTCODE_REGEX.find(trimmed) {
            Some(m) => &trimmed[m.end()..],
            None => trimmed,
        };
        if trimmed.len() == rest.len() {
            break;
        }
        rest = trimmed;
    }

    if rest.is_empty() {
        subject
    } else {
        rest
    }
}

impl CommitParser for ConventionalParser {
    fn parse(&self, commit: &CommitInfo) -> ParseOutcome {
        let parsed = match self.parse_message(&commit.message) {
            Ok(parsed) => parsed,
            Err(reason) => return ParseOutcome::Skip(reason),
        };

        ParseOutcome::Parsed(ParsedCommit {
            hash: commit.hash.clone(),
            short_hash: commit.short_hash.clone(),
            commit_type: parsed.commit_type,
            scope: parsed.scope,
            breaking: parsed.breaking,
            subject: parsed.subject,
            body: parsed.body,
            footers: parsed.footers,
            author: commit.author.clone(),
            timestamp: commit.timestamp,
        })
    }
}
