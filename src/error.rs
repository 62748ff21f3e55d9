use thiserror::Error;

/// Unified error type for git-release-notes operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("version '{version}' looks incorrect\ntip: did you forget --tag-prefix option?")]
    MalformedVersion { version: String },

    #[error("failed {operation}\noutput: {detail}\ntip: most common reason: incorrect git commit SHA")]
    Query { operation: String, detail: String },

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release-notes
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a malformed-version error for a string that failed to decompose
    pub fn malformed_version(version: impl Into<String>) -> Self {
        ReleaseError::MalformedVersion {
            version: version.into(),
        }
    }

    /// Create an external-query error carrying the failing operation and its output
    pub fn query(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        ReleaseError::Query {
            operation: operation.into(),
            detail: detail.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Process exit status for this failure: 3 for malformed versions,
    /// 2 for failed history queries, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::MalformedVersion { .. } => 3,
            ReleaseError::Query { .. } | ReleaseError::Git(_) => 2,
            _ => 1,
        }
    }
}
