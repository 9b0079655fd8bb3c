//! Fixed names inside a prompt library.

use std::path::Path;

/// One of the two tracked content directories of a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentRoot {
    /// `prompts/`, one directory per prompt
    Prompts,
    /// `fragments/`, one markdown file per fragment grouped by category
    Fragments,
}

impl ContentRoot {
    /// Both content roots in display order.
    pub const ALL: [ContentRoot; 2] = [ContentRoot::Prompts, ContentRoot::Fragments];

    /// Directory name relative to the library base.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompts => "prompts",
            Self::Fragments => "fragments",
        }
    }

    /// Pathspec form with a trailing slash, as reported by git status.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Prompts => "prompts/",
            Self::Fragments => "fragments/",
        }
    }

    /// Pathspecs for every content root, suitable for `git add` and `git diff`.
    pub fn pathspecs() -> Vec<String> {
        Self::ALL.iter().map(|r| r.prefix().to_string()).collect()
    }

    /// Split a repository-relative path into its content root and the
    /// remainder below it.
    ///
    /// Returns `None` for anything outside `prompts/` and `fragments/`
    /// (ignore files, config, caches) and for the bare root itself.
    pub fn split(path: &str) -> Option<(ContentRoot, &str)> {
        let path = path.strip_prefix("./").unwrap_or(path);
        Self::ALL.into_iter().find_map(|root| {
            path.strip_prefix(root.prefix())
                .filter(|rest| !rest.is_empty())
                .map(|rest| (root, rest))
        })
    }

    /// Whether a repository-relative path lives under a content root.
    pub fn contains(path: &str) -> bool {
        Self::split(path).is_some()
    }
}

impl AsRef<Path> for ContentRoot {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for ContentRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Non-content markers inside the library base directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryPath {
    /// The `.git` directory
    GitDir,
    /// The `.gitignore` file written during setup
    Gitignore,
}

impl LibraryPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitDir => ".git",
            Self::Gitignore => ".gitignore",
        }
    }
}

impl AsRef<Path> for LibraryPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for LibraryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
