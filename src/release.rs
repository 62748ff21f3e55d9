//! Release aggregation: the computation pipeline that turns a revision
//! range into a next version plus grouped, deduplicated release notes,
//! and the renderers for the full/short/one-line text forms.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::classify::{Group, Severity};
use crate::conventional::{ChangeLine, MessageParser, ParsedCommit};
use crate::error::Result;
use crate::git::{History, RevRange};
use crate::version::{self, Version};

/// Options controlling a release computation
#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
    /// Tag-name prefix used when resolving the last release
    pub tag_prefix: String,
    /// Render versions with the tag prefix attached
    pub as_tag: bool,
    /// Keep only change lines whose scope is absent or matches
    pub scope: Option<String>,
    /// Range start; defaults to the last release tag when one exists
    pub initial_revision: Option<String>,
    /// Range end; empty means HEAD
    pub last_revision: String,
    /// Keep pre-release tags as last-release candidates
    pub allow_pre_releases: bool,
}

/// Version block of the release summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub last: Option<String>,
    pub increment: Severity,
    pub current: String,
}

/// Complete result of a release computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub version: VersionInfo,
    pub commits: Vec<ParsedCommit>,
}

/// Output form for rendered release notes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesFormat {
    /// Grouped headings with per-entry commit ids
    Full,
    /// Bullets only, suitable for a tag description
    Short,
    /// First short-form line, with an ellipsis when truncating non-features
    OneLine,
}

/// Walk the revision range and reduce it to a release summary.
///
/// Resolves the last release, fetches and parses the commits, applies the
/// scope filter, computes the overall severity and the next version.
pub fn compute_release<H: History>(history: &H, options: &ReleaseOptions) -> Result<ReleaseInfo> {
    let last_revision = if options.last_revision.is_empty() {
        "HEAD"
    } else {
        options.last_revision.as_str()
    };

    let resolved = version::resolve_last_release(
        history,
        &options.tag_prefix,
        last_revision,
        options.allow_pre_releases,
    )?;

    // without an explicit start, the range begins at the last release;
    // a bootstrap (no real release) walks the whole history
    let initial = match options
        .initial_revision
        .as_deref()
        .filter(|rev| !rev.is_empty())
    {
        Some(rev) => Some(rev.to_string()),
        None if resolved.not_found => None,
        None => Some(resolved.version.clone()),
    };
    let range = RevRange::new(initial.as_deref(), last_revision);

    let raw_commits = history.commits_in_range(&range)?;
    let parser = MessageParser::new();
    let mut commits: Vec<ParsedCommit> = raw_commits
        .iter()
        .map(|raw| parser.parse_commit(raw))
        .collect();

    if let Some(scope) = options.scope.as_deref().filter(|scope| !scope.is_empty()) {
        filter_by_scope(&mut commits, scope);
    }

    let increment = version::overall_severity(
        commits
            .iter()
            .flat_map(|commit| &commit.headers)
            .map(|header| header.severity),
    );

    let mut last_release = resolved.version;
    if !options.tag_prefix.is_empty() {
        if let Some(stripped) = last_release.strip_prefix(&options.tag_prefix) {
            last_release = stripped.to_string();
        }
    }

    let mut current = Version::parse(&last_release)?.increment(increment).to_string();

    if options.as_tag && !options.tag_prefix.is_empty() {
        current = format!("{}{}", options.tag_prefix, current);
        last_release = format!("{}{}", options.tag_prefix, last_release);
    }

    Ok(ReleaseInfo {
        version: VersionInfo {
            last: Some(last_release),
            increment,
            current,
        },
        commits,
    })
}

/// A change line survives when its scope is absent or equals the requested
/// one; a commit left without lines is dropped entirely and contributes
/// nothing to severity or notes.
fn filter_by_scope(commits: &mut Vec<ParsedCommit>, scope: &str) {
    commits.retain_mut(|commit| {
        commit
            .headers
            .retain(|header| header.scope.as_deref().map_or(true, |s| s == scope));
        !commit.headers.is_empty()
    });
}

/// Render-ready note record; identical records collapse within a group
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseLine {
    pub id: String,
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
}

impl ReleaseLine {
    fn of(commit: &ParsedCommit, line: &ChangeLine) -> Self {
        ReleaseLine {
            id: commit.id.chars().take(7).collect(),
            r#type: line.r#type.clone(),
            scope: line.scope.clone(),
            description: line.description.clone(),
        }
    }

    /// `type(scope): ` prefix; empty for bare feat/fix entries
    fn prefix(&self) -> String {
        let bare = matches!(self.r#type.as_str(), "feat" | "fix") && self.scope.is_none();
        if bare {
            return String::new();
        }
        match &self.scope {
            Some(scope) => format!("{}({}): ", self.r#type, scope),
            None => format!("{}: ", self.r#type),
        }
    }
}

/// Render the aggregated notes of a release in the requested form.
pub fn render_notes(info: &ReleaseInfo, format: NotesFormat) -> String {
    let groups = lines_per_group(info);
    let short = matches!(format, NotesFormat::Short | NotesFormat::OneLine);

    let blocks: Vec<(Group, String)> = Group::RENDER_ORDER
        .iter()
        .filter_map(|group| {
            groups
                .get(group)
                .filter(|lines| !lines.is_empty())
                .map(|lines| (*group, group_block(*group, lines, short)))
        })
        .collect();

    match format {
        NotesFormat::Full => join_blocks(&blocks, "\n\n"),
        NotesFormat::Short => join_blocks(&blocks, "\n"),
        NotesFormat::OneLine => {
            let (first_group, first_block) = match blocks.first() {
                Some(block) => block,
                None => return String::new(),
            };
            let first_line = first_block.lines().next().unwrap_or("").to_string();
            if *first_group == Group::Features {
                first_line
            } else {
                format!("{}...", first_line)
            }
        }
    }
}

fn lines_per_group(info: &ReleaseInfo) -> BTreeMap<Group, BTreeSet<ReleaseLine>> {
    let mut groups: BTreeMap<Group, BTreeSet<ReleaseLine>> = BTreeMap::new();
    for commit in &info.commits {
        for header in &commit.headers {
            if let Some(group) = header.group {
                groups
                    .entry(group)
                    .or_default()
                    .insert(ReleaseLine::of(commit, header));
            }
        }
    }
    groups
}

fn group_block(group: Group, lines: &BTreeSet<ReleaseLine>, short: bool) -> String {
    let bullets: Vec<String> = lines
        .iter()
        .map(|line| {
            if short {
                format!("- {}{}", line.prefix(), line.description)
            } else {
                format!("- ({}) {}{}", line.id, line.prefix(), line.description)
            }
        })
        .collect();

    if short {
        bullets.join("\n")
    } else {
        format!("### {}\n\n{}", group, bullets.join("\n"))
    }
}

fn join_blocks(blocks: &[(Group, String)], separator: &str) -> String {
    blocks
        .iter()
        .map(|(_, block)| block.as_str())
        .collect::<Vec<&str>>()
        .join(separator)
}
