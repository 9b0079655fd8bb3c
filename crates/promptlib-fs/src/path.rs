//! Forward-slash path handling
//!
//! Git reports paths with forward slashes on every platform, and the content
//! classification works on those strings directly. `NormalizedPath` keeps the
//! same representation for library paths so the two can be compared and
//! joined without per-platform branching.

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Converted to a platform-native `PathBuf` only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment. The segment may itself contain slashes.
    pub fn join(&self, segment: impl AsRef<str>) -> Self {
        let segment = segment.as_ref().replace('\\', "/");
        let segment = segment.trim_start_matches('/');
        let joined = if self.inner.is_empty() {
            segment.to_string()
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Get the extension if present. Dotfiles have no extension.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        })
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backslashes_become_forward_slashes() {
        let path = NormalizedPath::new("C:\\library\\prompts");
        assert_eq!(path.as_str(), "C:/library/prompts");
    }

    #[test]
    fn join_accepts_nested_segments() {
        let base = NormalizedPath::new("/lib");
        assert_eq!(base.join("fragments/common/x.md").as_str(), "/lib/fragments/common/x.md");
        assert_eq!(base.join("/prompts").as_str(), "/lib/prompts");
    }

    #[test]
    fn extension_ignores_dotfiles() {
        assert_eq!(NormalizedPath::new("/lib/.gitignore").extension(), None);
        assert_eq!(NormalizedPath::new("/lib/a/x.md").extension(), Some("md"));
    }
}
