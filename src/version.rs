//! Semantic version arithmetic and prior-release resolution.

use std::fmt;

use crate::classify::Severity;
use crate::error::{ReleaseError, Result};
use crate::git::{DescribeRequest, History};

const SEPARATORS: &[char] = &['.', '-', '+'];

/// Semantic version triple with an optional retained suffix.
///
/// The suffix (pre-release/build remainder, separator included) is kept
/// for display only; [Version::increment] always drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub suffix: Option<String>,
}

impl Version {
    /// Create a bare version triple
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            suffix: None,
        }
    }

    /// Parse a version string by splitting on `.`/`-`/`+` separators.
    ///
    /// The three leading components must be non-negative integers;
    /// anything after them is retained as the display suffix. Fails with
    /// [ReleaseError::MalformedVersion] otherwise, which carries a hint
    /// about the tag-prefix setting.
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || ReleaseError::malformed_version(text);

        let parts: Vec<&str> = text.split(SEPARATORS).collect();
        if parts.len() < 3 {
            return Err(malformed());
        }

        let major: u64 = parts[0].parse().map_err(|_| malformed())?;
        let minor: u64 = parts[1].parse().map_err(|_| malformed())?;
        let patch: u64 = parts[2].parse().map_err(|_| malformed())?;

        let consumed = parts[0].len() + 1 + parts[1].len() + 1 + parts[2].len();
        let suffix = text
            .get(consumed..)
            .filter(|rest| !rest.is_empty())
            .map(|rest| rest.to_string());

        Ok(Version {
            major,
            minor,
            patch,
            suffix,
        })
    }

    /// Increment according to the severity. The result is always a bare
    /// `major.minor.patch` triple; a `none` severity keeps the numbers
    /// unchanged but still drops any suffix.
    pub fn increment(&self, severity: Severity) -> Version {
        let mut next = Version::new(self.major, self.minor, self.patch);
        match severity {
            Severity::None => {}
            Severity::Patch => next.patch += 1,
            Severity::Minor => {
                next.minor += 1;
                next.patch = 0;
            }
            Severity::Major => {
                next.major += 1;
                next.minor = 0;
                next.patch = 0;
            }
        }
        next
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(suffix) = &self.suffix {
            f.write_str(suffix)?;
        }
        Ok(())
    }
}

/// Outcome of a version lookup against the tag history.
///
/// `not_found` marks a bootstrap version synthesized from a bare commit
/// id, meaning there is no real prior release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub version: String,
    pub not_found: bool,
}

/// Describe `commitish` through the history collaborator and normalize
/// the answer: a bare commit id becomes the bootstrap version
/// `0.1.0-<first 8 hex chars>` flagged as not found.
pub fn describe_version<H: History>(
    history: &H,
    tag_prefix: &str,
    include_pre_releases: bool,
    abbrev: u32,
    commitish: &str,
) -> Result<ResolvedRelease> {
    let described = history.describe(&DescribeRequest {
        tag_prefix: tag_prefix.to_string(),
        include_pre_releases,
        abbrev,
        commitish: commitish.to_string(),
    })?;

    if looks_like_commit_id(&described) {
        let short = &described[..described.len().min(8)];
        return Ok(ResolvedRelease {
            version: format!("0.1.0-{}", short),
            not_found: true,
        });
    }

    Ok(ResolvedRelease {
        version: described,
        not_found: false,
    })
}

/// Resolve the version of the last release: the nearest matching tag
/// strictly before `last_revision` (which defaults to HEAD when empty).
pub fn resolve_last_release<H: History>(
    history: &H,
    tag_prefix: &str,
    last_revision: &str,
    include_pre_releases: bool,
) -> Result<ResolvedRelease> {
    let last = if last_revision.is_empty() {
        "HEAD"
    } else {
        last_revision
    };

    describe_version(
        history,
        tag_prefix,
        include_pre_releases,
        0,
        &format!("{}^", last),
    )
}

/// Maximum severity across a collection, `none` when it is empty.
pub fn overall_severity(severities: impl IntoIterator<Item = Severity>) -> Severity {
    severities
        .into_iter()
        .max()
        .unwrap_or(Severity::None)
}

fn looks_like_commit_id(text: &str) -> bool {
    (5..=40).contains(&text.len())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockHistory;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
        assert_eq!(v.suffix, None);
    }

    #[test]
    fn test_version_parse_keeps_suffix() {
        let v = Version::parse("1.2.3-rc.1+build5").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
        assert_eq!(v.suffix.as_deref(), Some("-rc.1+build5"));
        assert_eq!(v.to_string(), "1.2.3-rc.1+build5");
    }

    #[test]
    fn test_version_parse_extra_numeric_components() {
        let v = Version::parse("1.2.3.4").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
        assert_eq!(v.suffix.as_deref(), Some(".4"));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("v1.2.3").is_err());
        assert!(Version::parse("release").is_err());
        assert!(Version::parse("1..3").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_version_parse_error_exit_code() {
        let err = Version::parse("v1.2.3").unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("--tag-prefix"));
    }

    #[test]
    fn test_increment_table() {
        let v = Version::parse("1.4.9").unwrap();
        assert_eq!(v.increment(Severity::None).to_string(), "1.4.9");
        assert_eq!(v.increment(Severity::Patch).to_string(), "1.4.10");
        assert_eq!(v.increment(Severity::Minor).to_string(), "1.5.0");
        assert_eq!(v.increment(Severity::Major).to_string(), "2.0.0");
    }

    #[test]
    fn test_increment_drops_suffix() {
        let v = Version::parse("0.1.0-deadbeef").unwrap();
        assert_eq!(v.increment(Severity::None).to_string(), "0.1.0");
        assert_eq!(v.increment(Severity::Minor).to_string(), "0.2.0");
    }

    #[test]
    fn test_overall_severity() {
        assert_eq!(overall_severity(Vec::new()), Severity::None);
        assert_eq!(
            overall_severity([Severity::Patch, Severity::Minor, Severity::Patch]),
            Severity::Minor
        );
        assert_eq!(
            overall_severity([Severity::None, Severity::Major]),
            Severity::Major
        );
    }

    #[test]
    fn test_resolve_last_release_tag() {
        let mut history = MockHistory::new();
        history.add_describe("HEAD^", "v1.4.9");

        let resolved = resolve_last_release(&history, "v", "", false).unwrap();
        assert_eq!(resolved.version, "v1.4.9");
        assert!(!resolved.not_found);
    }

    #[test]
    fn test_resolve_last_release_bootstrap() {
        let mut history = MockHistory::new();
        history.add_describe("HEAD^", "deadbeef12");

        let resolved = resolve_last_release(&history, "", "HEAD", false).unwrap();
        assert_eq!(resolved.version, "0.1.0-deadbeef");
        assert!(resolved.not_found);
    }

    #[test]
    fn test_resolve_last_release_short_id() {
        let mut history = MockHistory::new();
        history.add_describe("abc123^", "ab12c");

        let resolved = resolve_last_release(&history, "", "abc123", false).unwrap();
        assert_eq!(resolved.version, "0.1.0-ab12c");
        assert!(resolved.not_found);
    }

    #[test]
    fn test_looks_like_commit_id() {
        assert!(looks_like_commit_id("deadbeef12"));
        assert!(looks_like_commit_id("ab12c"));
        assert!(!looks_like_commit_id("abcd")); // too short
        assert!(!looks_like_commit_id("v1.2.3"));
        assert!(!looks_like_commit_id("DEADBEEF12")); // uppercase is not a git id
    }
}
