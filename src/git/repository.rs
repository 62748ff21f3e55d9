use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use chrono::{FixedOffset, TimeZone};
use git2::{Commit, Oid, Repository};

use crate::error::{ReleaseError, Result};
use crate::git::{DescribeRequest, History, RawCommit, RevRange};

/// Real history queries backed by the `git2` crate
pub struct GitHistory {
    repo: Repository,
}

// `git2::Repository` is `Send` but not `Sync`; `GitHistory` is only ever
// accessed single-threaded, so it is safe to assert `Sync` here to satisfy
// the `History: Send + Sync` bound.
unsafe impl Sync for GitHistory {}

impl GitHistory {
    /// Open or discover a git repository at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;

        Ok(GitHistory { repo })
    }

    fn resolve_commit(&self, commitish: &str) -> Result<Commit<'_>> {
        let object = self.repo.revparse_single(commitish).map_err(|e| {
            ReleaseError::query(format!("resolving revision '{}'", commitish), e.message())
        })?;

        object.peel_to_commit().map_err(|e| {
            ReleaseError::query(
                format!("peeling revision '{}' to a commit", commitish),
                e.message(),
            )
        })
    }

    /// Candidate tags matching `<prefix>*.*.*`, mapped to the commit they
    /// point at. When several candidates share a commit the
    /// lexicographically greatest name wins, for determinism.
    fn candidate_tags(&self, req: &DescribeRequest) -> Result<HashMap<Oid, String>> {
        let pattern = format!("{}*.*.*", req.tag_prefix);
        let names = self.repo.tag_names(Some(&pattern))?;

        let mut tags: HashMap<Oid, String> = HashMap::new();
        for name in names.iter().flatten() {
            if !req.include_pre_releases {
                let remainder = &name[req.tag_prefix.len()..];
                if remainder.contains('-') || remainder.contains('+') {
                    continue;
                }
            }

            let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(reference) => reference,
                Err(_) => continue,
            };
            let oid = match reference.peel_to_commit() {
                Ok(commit) => commit.id(),
                Err(_) => continue,
            };

            match tags.entry(oid) {
                Entry::Vacant(entry) => {
                    entry.insert(name.to_string());
                }
                Entry::Occupied(mut entry) => {
                    if name > entry.get().as_str() {
                        entry.insert(name.to_string());
                    }
                }
            }
        }

        Ok(tags)
    }
}

impl History for GitHistory {
    fn describe(&self, req: &DescribeRequest) -> Result<String> {
        let target = self.resolve_commit(&req.commitish)?;
        let tags = self.candidate_tags(req)?;

        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        walk.push(target.id())?;

        let mut distance: u32 = 0;
        for oid in walk {
            let oid = oid?;
            if let Some(tag) = tags.get(&oid) {
                if distance == 0 || req.abbrev == 0 {
                    return Ok(tag.clone());
                }
                return Ok(format!(
                    "{}-{}-g{}",
                    tag,
                    distance,
                    short_id(target.id(), req.abbrev)
                ));
            }
            distance += 1;
        }

        // No candidate tag reachable: fall back to the bare commit id,
        // which callers recognize and turn into a bootstrap version.
        Ok(short_id(target.id(), req.abbrev.max(7)))
    }

    fn commits_in_range(&self, range: &RevRange) -> Result<Vec<RawCommit>> {
        let (initial, last) = match range {
            RevRange::Range { initial, last } => (Some(initial.as_str()), last.as_str()),
            RevRange::Ancestors { last } => (None, last.as_str()),
        };

        let head = self.resolve_commit(last)?;

        let mut walk = self.repo.revwalk()?;
        walk.push(head.id())?;
        if let Some(initial) = initial {
            let base = self.resolve_commit(initial)?;
            walk.hide(base.id())?;
        }

        let mut commits = Vec::new();
        for oid in walk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;

            // merge commits are excluded from release content
            if commit.parent_count() > 1 {
                continue;
            }

            commits.push(raw_commit(&commit));
        }

        Ok(commits)
    }
}

fn raw_commit(commit: &Commit<'_>) -> RawCommit {
    let author = commit.author();

    RawCommit {
        id: commit.id().to_string(),
        author: author.name().unwrap_or("").to_string(),
        email: author.email().map(|email| email.to_string()),
        date: format_time(&commit.time()),
        message: commit.message().unwrap_or("").to_string(),
    }
}

fn format_time(time: &git2::Time) -> String {
    let formatted = FixedOffset::east_opt(time.offset_minutes() * 60)
        .and_then(|offset| offset.timestamp_opt(time.seconds(), 0).single());

    match formatted {
        Some(date) => date.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
        None => time.seconds().to_string(),
    }
}

fn short_id(oid: Oid, width: u32) -> String {
    oid.to_string().chars().take(width.max(4) as usize).collect()
}
