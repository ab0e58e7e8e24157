use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the git service.
///
/// The dispatcher never recovers from any of these; it attaches the
/// mode-specific context and terminates the process.
#[derive(Debug, Error)]
pub enum GitServiceError {
    /// No repository could be discovered from, or opened at, `path`.
    #[error("no git repository found at or above {}", path.display())]
    RepositoryNotFound { path: PathBuf },

    /// `HEAD` is unborn: the repository has no commits yet.
    #[error("repository has no commits yet")]
    NoCommits,

    /// The revision does not resolve to a commit.
    #[error("commit not found: {rev}")]
    CommitNotFound { rev: String },

    /// A post-commit hook not written by this tool is already installed.
    #[error("{} already exists and was not installed by commit-scan (use --force to overwrite)", path.display())]
    HookExists { path: PathBuf },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitServiceError>;
