//! Classification rules mapping a commit type token to a version severity
//! and a release-note group. The two lookups are independent: a token can
//! contribute to the version bump while being suppressed from the notes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version increment implied by a change line.
///
/// The derived order is total: `None < Patch < Minor < Major`. Every
/// "maximum across a collection" reduction relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::None => "none",
            Severity::Patch => "patch",
            Severity::Minor => "minor",
            Severity::Major => "major",
        };
        f.write_str(name)
    }
}

/// Release-note bucket a change line renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Group {
    Features,
    Fixes,
    Other,
}

impl Group {
    /// Fixed rendering order of the note groups.
    pub const RENDER_ORDER: [Group; 3] = [Group::Features, Group::Fixes, Group::Other];
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Group::Features => "Features",
            Group::Fixes => "Fixes",
            Group::Other => "Other",
        };
        f.write_str(name)
    }
}

/// Severity lookup for a lowercased type token.
pub fn severity_of(token: &str) -> Severity {
    match token {
        "BREAKING CHANGE" => Severity::Major,

        "fix" | "hotfix" | "refactor" | "docs" | "perf" | "chore" | "ci" | "build" | "style"
        | "test" => Severity::Patch,

        "skip" | "wip" | "minor" => Severity::None,

        _ => Severity::Minor,
    }
}

/// Note-group lookup for a lowercased type token; `None` suppresses the
/// line from the notes entirely.
pub fn group_of(token: &str) -> Option<Group> {
    match token {
        "fix" | "hotfix" | "refactor" | "docs" | "perf" | "BREAKING CHANGE" => Some(Group::Fixes),

        "chore" | "ci" | "build" | "style" | "test" => Some(Group::Other),

        "skip" | "wip" | "minor" => None,

        _ => Some(Group::Features),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order_is_total() {
        assert!(Severity::None < Severity::Patch);
        assert!(Severity::Patch < Severity::Minor);
        assert!(Severity::Minor < Severity::Major);
    }

    #[test]
    fn test_severity_table() {
        assert_eq!(severity_of("BREAKING CHANGE"), Severity::Major);
        for token in [
            "fix", "hotfix", "refactor", "docs", "perf", "chore", "ci", "build", "style", "test",
        ] {
            assert_eq!(severity_of(token), Severity::Patch, "token: {}", token);
        }
        for token in ["skip", "wip", "minor"] {
            assert_eq!(severity_of(token), Severity::None, "token: {}", token);
        }
        assert_eq!(severity_of("feat"), Severity::Minor);
        assert_eq!(severity_of("anything-else"), Severity::Minor);
    }

    #[test]
    fn test_group_table() {
        for token in ["fix", "hotfix", "refactor", "docs", "perf", "BREAKING CHANGE"] {
            assert_eq!(group_of(token), Some(Group::Fixes), "token: {}", token);
        }
        for token in ["chore", "ci", "build", "style", "test"] {
            assert_eq!(group_of(token), Some(Group::Other), "token: {}", token);
        }
        for token in ["skip", "wip", "minor"] {
            assert_eq!(group_of(token), None, "token: {}", token);
        }
        assert_eq!(group_of("feat"), Some(Group::Features));
        assert_eq!(group_of("deps"), Some(Group::Features));
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Major).unwrap(), "\"major\"");
        assert_eq!(Severity::Patch.to_string(), "patch");
    }

    #[test]
    fn test_group_display_matches_headings() {
        assert_eq!(Group::Features.to_string(), "Features");
        assert_eq!(Group::Fixes.to_string(), "Fixes");
        assert_eq!(Group::Other.to_string(), "Other");
    }
}
