//! Error types for promptlib-git

/// Result type for promptlib-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in promptlib-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The git executable could not be started
    #[error("Failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    /// git ran and exited with a non-zero status
    #[error("`{command}` failed (exit code {code}): {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// `git status` produced output that does not follow the porcelain format
    #[error("Unexpected git status output: {entry:?}")]
    StatusParse { entry: String },

    #[error("Filesystem error: {0}")]
    Fs(#[from] promptlib_fs::Error),
}

impl Error {
    /// The message git itself printed, when there is one.
    pub fn git_message(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}
