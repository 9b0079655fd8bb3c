//! Error types for promptlib-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from promptlib-core
    #[error(transparent)]
    Core(#[from] promptlib_core::Error),

    /// Error from promptlib-fs
    #[error(transparent)]
    Fs(#[from] promptlib_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// A follow-up hint printed under the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Core(e) if e.needs_setup() => Some("Run `promptlib setup --remote <URL>` or `promptlib setup --local <DIR>`."),
            Self::Core(promptlib_core::Error::NoRemoteConfigured) => {
                Some("Pass --url or run `promptlib setup --remote <URL>`.")
            }
            Self::Core(promptlib_core::Error::LocalChangesBlockPull { .. }) => {
                Some("Use `promptlib push` or `promptlib reset` first.")
            }
            _ => None,
        }
    }
}
