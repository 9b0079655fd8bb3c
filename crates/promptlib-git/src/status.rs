//! Working tree status entries and the porcelain parser

use crate::{Error, Result};

/// The single-character change marker reported for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    /// `A`: new in the index (or renamed/copied into place)
    Added,
    /// `D`: removed from the working tree or the index
    Deleted,
    /// `M`: content differs from HEAD
    Modified,
    /// `?`: present on disk, unknown to git
    Untracked,
}

impl ChangeStatus {
    pub fn as_char(&self) -> char {
        match self {
            Self::Added => 'A',
            Self::Deleted => 'D',
            Self::Modified => 'M',
            Self::Untracked => '?',
        }
    }

    /// Parse a marker. Unknown markers return `None`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::Added),
            'D' => Some(Self::Deleted),
            'M' => Some(Self::Modified),
            '?' => Some(Self::Untracked),
            _ => None,
        }
    }

    /// Collapse the two porcelain columns (index `x`, working tree `y`) into
    /// one marker. Returns `None` for ignored entries.
    ///
    /// Additions win over everything else so that a file which was never
    /// committed is not later treated as restorable from HEAD.
    fn from_columns(x: char, y: char) -> Option<Self> {
        match (x, y) {
            ('?', '?') => Some(Self::Untracked),
            ('!', '!') => None,
            _ if x == 'A' || y == 'A' || matches!(x, 'R' | 'C') => Some(Self::Added),
            _ if x == 'D' || y == 'D' => Some(Self::Deleted),
            _ => Some(Self::Modified),
        }
    }
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One changed path as reported by `git status`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusEntry {
    /// Path relative to the working tree root, forward slashes
    pub path: String,
    pub status: ChangeStatus,
}

impl StatusEntry {
    pub fn new(path: impl Into<String>, status: ChangeStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// Parse the output of `git status --porcelain=v1 -z`.
///
/// Each record is `XY <path>` terminated by NUL. Renames and copies carry a
/// second NUL-terminated field with the original path. A rename reports the
/// original path as [`ChangeStatus::Deleted`]; a copy's original is untouched
/// and skipped.
pub fn parse_porcelain(output: &str) -> Result<Vec<StatusEntry>> {
    let mut entries = Vec::new();
    let mut fields = output.split('\0').filter(|f| !f.is_empty());

    while let Some(record) = fields.next() {
        let mut chars = record.chars();
        let (Some(x), Some(y), Some(' ')) = (chars.next(), chars.next(), chars.next()) else {
            return Err(Error::StatusParse {
                entry: record.to_string(),
            });
        };
        let path = chars.as_str();
        if path.is_empty() {
            return Err(Error::StatusParse {
                entry: record.to_string(),
            });
        }

        if let Some(status) = ChangeStatus::from_columns(x, y) {
            entries.push(StatusEntry::new(path, status));
        }

        if matches!(x, 'R' | 'C') {
            let Some(orig) = fields.next() else {
                return Err(Error::StatusParse {
                    entry: record.to_string(),
                });
            };
            if x == 'R' {
                entries.push(StatusEntry::new(orig, ChangeStatus::Deleted));
            }
        }
    }

    Ok(entries)
}
