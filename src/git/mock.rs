use std::collections::HashMap;

use crate::error::{ReleaseError, Result};
use crate::git::{DescribeRequest, History, RawCommit, RevRange};

/// Mock history for testing without a real repository
pub struct MockHistory {
    describes: HashMap<String, String>,
    commits: Vec<RawCommit>,
}

impl MockHistory {
    /// Create a new empty mock history
    pub fn new() -> Self {
        MockHistory {
            describes: HashMap::new(),
            commits: Vec::new(),
        }
    }

    /// Register the describe answer for a commitish
    pub fn add_describe(&mut self, commitish: impl Into<String>, result: impl Into<String>) {
        self.describes.insert(commitish.into(), result.into());
    }

    /// Add a raw commit to the mock log
    pub fn add_commit(&mut self, commit: RawCommit) {
        self.commits.push(commit);
    }

    /// Add a commit with placeholder metadata around the given message
    pub fn add_message(&mut self, id: impl Into<String>, message: impl Into<String>) {
        self.commits.push(RawCommit {
            id: id.into(),
            author: "Test Author".to_string(),
            email: Some("test@example.com".to_string()),
            date: "2024-01-01T00:00:00+00:00".to_string(),
            message: message.into(),
        });
    }
}

impl Default for MockHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl History for MockHistory {
    fn describe(&self, req: &DescribeRequest) -> Result<String> {
        self.describes.get(&req.commitish).cloned().ok_or_else(|| {
            ReleaseError::query(
                format!("describing '{}'", req.commitish),
                "no matching revision",
            )
        })
    }

    fn commits_in_range(&self, _range: &RevRange) -> Result<Vec<RawCommit>> {
        // Simplified: the whole log regardless of range
        Ok(self.commits.clone())
    }
}
