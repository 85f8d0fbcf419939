//! Semver impact resolution and next-version suggestion

use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use tracing::debug;

use chronicle_core::error::VersionError;
use chronicle_core::SemverImpact;
use chronicle_git::types::extract_version;

use crate::types::{ClassifiedCommit, ReleaseGroup};

/// Highest impact among the commits, hidden ones included.
///
/// An empty slice resolves to [`SemverImpact::None`].
pub fn resolve(commits: &[ClassifiedCommit]) -> SemverImpact {
    commits
        .iter()
        .map(|c| c.impact)
        .max()
        .unwrap_or_default()
}

/// Apply an impact to a version.
///
/// A patch bump on a prerelease just drops the prerelease. Build metadata is
/// always cleared by a bump.
pub fn suggest_next_version(current: &Version, impact: SemverImpact) -> Version {
    let mut next = current.clone();

    match impact {
        SemverImpact::Major => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        SemverImpact::Minor => {
            next.minor += 1;
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        SemverImpact::Patch => {
            if next.pre.is_empty() {
                next.patch += 1;
            } else {
                next.pre = Prerelease::EMPTY;
            }
        }
        SemverImpact::None => return next,
    }

    next.build = BuildMetadata::EMPTY;
    next
}

/// Parse a version, accepting a leading `v`
pub fn parse_version(version: &str) -> Result<Version, VersionError> {
    let trimmed = version.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).map_err(|e| VersionError::ParseFailed(version.to_string(), e.to_string()))
}

/// Render a tag name from a `{version}` pattern
pub fn format_tag(tag_format: &str, version: &Version) -> String {
    tag_format.replace("{version}", &version.to_string())
}

/// The release the unreleased commits would produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextRelease {
    /// Newest tag carrying a semantic version, if any
    pub previous_tag: Option<String>,
    /// Version the bump starts from; `0.0.0` without a previous tag
    pub previous_version: String,
    /// Impact of the unreleased commits
    pub impact: SemverImpact,
    /// Suggested version
    pub version: String,
    /// Suggested tag name
    pub tag: String,
}

/// Suggest the next release from grouped history.
///
/// Returns `None` when there are no unreleased commits or none of them has
/// an impact.
pub fn next_release(groups: &[ReleaseGroup], tag_format: &str) -> Option<NextRelease> {
    let unreleased = groups.first().filter(|g| g.is_unreleased())?;
    if unreleased.impact == SemverImpact::None {
        return None;
    }

    let previous = groups.iter().find_map(|g| {
        let name = g.name.as_deref()?;
        let version = Version::parse(&extract_version(name)?).ok()?;
        Some((name, version))
    });
    let (previous_tag, previous_version) = match previous {
        Some((name, version)) => (Some(name.to_string()), version),
        None => (None, Version::new(0, 0, 0)),
    };

    let version = suggest_next_version(&previous_version, unreleased.impact);
    debug!(
        previous = %previous_version,
        next = %version,
        impact = %unreleased.impact,
        "suggested next version"
    );

    Some(NextRelease {
        previous_tag,
        previous_version: previous_version.to_string(),
        impact: unreleased.impact,
        tag: format_tag(tag_format, &version),
        version: version.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_core::Category;
    use chrono::Utc;

    use crate::types::ParsedCommit;

    fn classified(impact: SemverImpact) -> ClassifiedCommit {
        ClassifiedCommit {
            commit: ParsedCommit {
                hash: "abc1234567890".to_string(),
                short_hash: "abc1234".to_string(),
                commit_type: "feat".to_string(),
                scope: None,
                breaking: false,
                subject: "x".to_string(),
                body: None,
                footers: Vec::new(),
                author: "Test".to_string(),
                timestamp: Utc::now(),
            },
            category: Category::Features,
            impact,
            hidden: false,
        }
    }

    fn group(name: Option<&str>, impacts: &[SemverImpact]) -> ReleaseGroup {
        let commits: Vec<_> = impacts.iter().copied().map(classified).collect();
        ReleaseGroup {
            name: name.map(str::to_string),
            date: None,
            impact: resolve(&commits),
            commits,
            buckets: Vec::new(),
        }
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_resolve_takes_maximum() {
        assert_eq!(resolve(&[]), SemverImpact::None);
        assert_eq!(
            resolve(&[classified(SemverImpact::Patch), classified(SemverImpact::Minor)]),
            SemverImpact::Minor
        );
        assert_eq!(
            resolve(&[
                classified(SemverImpact::Major),
                classified(SemverImpact::Patch),
                classified(SemverImpact::None)
            ]),
            SemverImpact::Major
        );
    }

    #[test]
    fn test_suggest_next_version() {
        assert_eq!(suggest_next_version(&v("1.2.3"), SemverImpact::Major), v("2.0.0"));
        assert_eq!(suggest_next_version(&v("1.2.3"), SemverImpact::Minor), v("1.3.0"));
        assert_eq!(suggest_next_version(&v("1.2.3"), SemverImpact::Patch), v("1.2.4"));
        assert_eq!(suggest_next_version(&v("1.2.3"), SemverImpact::None), v("1.2.3"));
        assert_eq!(suggest_next_version(&v("0.2.0-test"), SemverImpact::Patch), v("0.2.0"));
        assert_eq!(suggest_next_version(&v("0.2.0-test"), SemverImpact::Minor), v("0.3.0"));
        assert_eq!(suggest_next_version(&v("1.0.0+build.5"), SemverImpact::Patch), v("1.0.1"));
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("v1.2.3").unwrap(), v("1.2.3"));
        assert_eq!(parse_version(" 0.1.0 ").unwrap(), v("0.1.0"));
        assert!(matches!(parse_version("one"), Err(VersionError::ParseFailed(..))));
    }

    #[test]
    fn test_next_release_from_latest_versioned_tag() {
        let groups = vec![
            group(None, &[SemverImpact::Patch, SemverImpact::Minor]),
            group(Some("nightly"), &[SemverImpact::Patch]),
            group(Some("v0.2.0-test"), &[SemverImpact::Minor]),
            group(Some("v0.1.0"), &[SemverImpact::Minor]),
        ];

        let next = next_release(&groups, "v{version}").unwrap();
        assert_eq!(next.previous_tag.as_deref(), Some("v0.2.0-test"));
        assert_eq!(next.previous_version, "0.2.0-test");
        assert_eq!(next.impact, SemverImpact::Minor);
        assert_eq!(next.version, "0.3.0");
        assert_eq!(next.tag, "v0.3.0");
    }

    #[test]
    fn test_next_release_without_tags() {
        let groups = vec![group(None, &[SemverImpact::Patch])];
        let next = next_release(&groups, "release-{version}").unwrap();

        assert_eq!(next.previous_tag, None);
        assert_eq!(next.version, "0.0.1");
        assert_eq!(next.tag, "release-0.0.1");
    }

    #[test]
    fn test_no_next_release() {
        assert_eq!(next_release(&[], "v{version}"), None);
        assert_eq!(
            next_release(&[group(Some("v1.0.0"), &[SemverImpact::Major])], "v{version}"),
            None
        );
        assert_eq!(
            next_release(&[group(None, &[SemverImpact::None])], "v{version}"),
            None
        );
    }
}
