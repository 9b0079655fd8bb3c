//! Error types for promptlib-core

use std::path::PathBuf;

/// Result type for promptlib-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in promptlib-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Library directory, content directories or repository are missing
    #[error("Prompt library is not set up. Run `promptlib setup` first")]
    NotSetUp,

    /// Git integration is turned off in the settings
    #[error("Git integration is disabled (use_git = false)")]
    GitDisabled,

    /// The library directory has no `.git`
    #[error("Library is not a git repository")]
    NotInitialized,

    /// No URL given, none configured, and no `origin` remote
    #[error("No remote repository configured")]
    NoRemoteConfigured,

    /// Pulling would overwrite local prompt or fragment edits
    #[error("{count} local change(s) in prompts or fragments; push or reset them before pulling")]
    LocalChangesBlockPull { count: usize },

    #[error("No changes to push")]
    NothingToPush,

    #[error("No changes to reset")]
    NothingToReset,

    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    /// A change record points outside `prompts/` and `fragments/`
    #[error("Refusing to touch a path outside prompts and fragments: {path}")]
    OutsideContentRoots { path: String },

    /// The reset batch ran but the database re-sync afterwards failed
    #[error("Reset {success_count} change(s) ({fail_count} failed) but database sync failed: {message}")]
    ResetResyncFailed {
        success_count: usize,
        fail_count: usize,
        message: String,
    },

    /// Database re-sync after a content change failed
    #[error("Database sync failed: {message}")]
    DatabaseSync { message: String },

    /// Settings could not be read or written
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Transparent wrappers for underlying crate errors
    /// Failure reported by the version-control adapter
    #[error(transparent)]
    Vcs(#[from] promptlib_git::Error),

    /// Filesystem error from promptlib-fs
    #[error(transparent)]
    Fs(#[from] promptlib_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error means the library needs setup before use.
    pub fn needs_setup(&self) -> bool {
        matches!(self, Self::NotSetUp | Self::NotInitialized)
    }
}
