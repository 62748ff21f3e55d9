//! Git history abstraction layer
//!
//! The [History] trait isolates the two queries this tool needs from the
//! version-control system: the nearest-matching-tag lookup (describe) and
//! the commit log for a revision range. Concrete implementations:
//!
//! - [repository::GitHistory]: real queries through the `git2` crate
//! - [mock::MockHistory]: canned answers for testing
//!
//! Code above this layer depends on the trait, never on `git2` directly.

pub mod mock;
pub mod repository;

pub use mock::MockHistory;
pub use repository::GitHistory;

use std::fmt;

use crate::error::Result;

/// One commit record as obtained from the history query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    /// Full hex commit id
    pub id: String,
    /// Author name
    pub author: String,
    /// Author email, when recorded
    pub email: Option<String>,
    /// Commit date, formatted by the history layer
    pub date: String,
    /// Full message text
    pub message: String,
}

/// Revision range for a commit-log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevRange {
    /// `initial..last`: commits reachable from `last` but not from `initial`.
    Range { initial: String, last: String },
    /// All ancestors of `last`.
    Ancestors { last: String },
}

impl RevRange {
    /// Build a range from an optional starting revision. An empty or absent
    /// start means "all ancestors of `last`".
    pub fn new(initial: Option<&str>, last: &str) -> Self {
        match initial {
            Some(rev) if !rev.is_empty() => RevRange::Range {
                initial: rev.to_string(),
                last: last.to_string(),
            },
            _ => RevRange::Ancestors {
                last: last.to_string(),
            },
        }
    }
}

impl fmt::Display for RevRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevRange::Range { initial, last } => write!(f, "{}..{}", initial, last),
            RevRange::Ancestors { last } => f.write_str(last),
        }
    }
}

/// Parameters for the nearest-tag lookup (git-describe semantics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeRequest {
    /// Only tags matching `<tag_prefix>*.*.*` are candidates
    pub tag_prefix: String,
    /// Keep tags whose remainder carries a `-`/`+` pre-release marker
    pub include_pre_releases: bool,
    /// Commit-id abbreviation width; 0 returns the bare tag name
    pub abbrev: u32,
    /// Revision the lookup starts from
    pub commitish: String,
}

/// History-query collaborator.
///
/// Both operations are single synchronous request/response calls with no
/// retries; a failure is fatal to the caller.
pub trait History: Send + Sync {
    /// Nearest tag matching the request's prefix pattern at or before
    /// `commitish`. Returns `tag`, or `tag-N-g<short>` when the commit is
    /// N > 0 commits past the tag and `abbrev` is nonzero, or the short
    /// commit id when no tag matches at all.
    fn describe(&self, req: &DescribeRequest) -> Result<String>;

    /// Commits in `range`, newest first, merge commits excluded.
    fn commits_in_range(&self, range: &RevRange) -> Result<Vec<RawCommit>>;
}
