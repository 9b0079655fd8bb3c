//! Classification of pending content changes
//!
//! Git reports repository-relative paths with a status marker. The reset and
//! push workflows need them grouped by content kind, relative to their content
//! root, and tagged with how a reset would undo them.

use promptlib_fs::ContentRoot;
use promptlib_git::{ChangeStatus, StatusEntry};
use serde::Serialize;

/// Which content root a change belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Prompt,
    Fragment,
}

impl ContentKind {
    pub fn root(&self) -> ContentRoot {
        match self {
            Self::Prompt => ContentRoot::Prompts,
            Self::Fragment => ContentRoot::Fragments,
        }
    }
}

impl From<ContentRoot> for ContentKind {
    fn from(root: ContentRoot) -> Self {
        match root {
            ContentRoot::Prompts => Self::Prompt,
            ContentRoot::Fragments => Self::Fragment,
        }
    }
}

/// How a reset undoes a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetType {
    /// Remove the file from disk
    Delete,
    /// Check the committed version out of HEAD
    Restore,
}

/// What happened to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginalType {
    Added,
    Deleted,
    Modified,
}

impl OriginalType {
    pub fn from_status(status: ChangeStatus) -> Self {
        match status {
            ChangeStatus::Added | ChangeStatus::Untracked => Self::Added,
            ChangeStatus::Deleted => Self::Deleted,
            ChangeStatus::Modified => Self::Modified,
        }
    }

    pub fn reset_type(&self) -> ResetType {
        match self {
            Self::Added => ResetType::Delete,
            Self::Deleted | Self::Modified => ResetType::Restore,
        }
    }

    /// Verb used in change summaries.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Added => "Add",
            Self::Modified => "Modify",
            Self::Deleted => "Delete",
        }
    }
}

/// A pending change scoped to one content root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub kind: ContentKind,
    /// Path below the content root, e.g. `foo/bar.md` for `prompts/foo/bar.md`
    pub path: String,
    pub reset_type: ResetType,
    pub original_type: OriginalType,
}

impl ChangeRecord {
    pub fn new(kind: ContentKind, path: impl Into<String>, original_type: OriginalType) -> Self {
        Self {
            kind,
            path: path.into(),
            reset_type: original_type.reset_type(),
            original_type,
        }
    }

    /// Classify a status entry. Entries outside the content roots give `None`.
    pub fn classify(entry: &StatusEntry) -> Option<Self> {
        let (root, rest) = ContentRoot::split(&entry.path)?;
        Some(Self::new(
            root.into(),
            rest,
            OriginalType::from_status(entry.status),
        ))
    }

    /// Whether the path stays below its content root.
    pub fn is_contained(&self) -> bool {
        stays_within(&self.path)
    }

    /// Repository-relative path of the change.
    ///
    /// A fragment given as `category/name` resolves to `category/name.md`.
    pub fn repo_path(&self) -> String {
        let root = self.kind.root();
        let rel = self.path.trim_start_matches('/');
        let is_bare_fragment = self.kind == ContentKind::Fragment
            && !rel.ends_with(".md")
            && rel.split('/').filter(|s| !s.is_empty()).count() == 2;

        if is_bare_fragment {
            format!("{}{rel}.md", root.prefix())
        } else {
            format!("{}{rel}", root.prefix())
        }
    }
}

/// Whether `rel` names something strictly below the directory it is joined
/// to: relative, no `..` segments, not just `.` or empty.
pub fn stays_within(rel: &str) -> bool {
    if rel.starts_with(['/', '\\']) || rel.get(1..2) == Some(":") {
        return false;
    }
    let mut named = false;
    for segment in rel.split(['/', '\\']) {
        match segment {
            ".." => return false,
            "" | "." => {}
            _ => named = true,
        }
    }
    named
}

impl std::fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.original_type.verb(), self.repo_path())
    }
}

/// Pending changes grouped for the reset workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResetPlan {
    pub prompt_changes: Vec<ChangeRecord>,
    pub fragment_changes: Vec<ChangeRecord>,
}

impl ResetPlan {
    pub fn from_entries(entries: &[StatusEntry]) -> Self {
        let mut plan = Self::default();
        for record in entries.iter().filter_map(ChangeRecord::classify) {
            match record.kind {
                ContentKind::Prompt => plan.prompt_changes.push(record),
                ContentKind::Fragment => plan.fragment_changes.push(record),
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.prompt_changes.is_empty() && self.fragment_changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prompt_changes.len() + self.fragment_changes.len()
    }

    /// Prompts first, then fragments.
    pub fn all(&self) -> Vec<ChangeRecord> {
        self.prompt_changes
            .iter()
            .chain(&self.fragment_changes)
            .cloned()
            .collect()
    }
}

/// Keep only entries under a content root.
pub fn content_entries(entries: Vec<StatusEntry>) -> Vec<StatusEntry> {
    entries
        .into_iter()
        .filter(|e| ContentRoot::contains(&e.path))
        .collect()
}

const RULE_WIDTH: usize = 100;

/// Render one titled block of changes, one `<Verb> <path>` line each.
///
/// Returns an empty string for no entries.
pub fn format_changes(entries: &[StatusEntry], title: &str) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let rule = "─".repeat(RULE_WIDTH);
    let mut lines = vec![format!("{title} Changes ({}):", entries.len()), rule.clone()];
    for entry in entries {
        let verb = OriginalType::from_status(entry.status).verb();
        lines.push(format!("{verb:<8} {}", entry.path));
    }
    lines.push(rule);
    lines.join("\n")
}

/// Prompts block followed by the fragments block.
pub fn changes_summary(entries: &[StatusEntry]) -> String {
    let (prompts, fragments): (Vec<_>, Vec<_>) = entries
        .iter()
        .filter(|e| ContentRoot::contains(&e.path))
        .cloned()
        .partition(|e| matches!(ContentRoot::split(&e.path), Some((ContentRoot::Prompts, _))));

    [
        format_changes(&prompts, "Prompts"),
        format_changes(&fragments, "Fragments"),
    ]
    .into_iter()
    .filter(|block| !block.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n")
}
