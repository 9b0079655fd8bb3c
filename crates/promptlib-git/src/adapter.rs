//! The version-control interface used by the sync engine

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{DiffArgs, RemoteInfo, Result, StatusEntry};

/// Result of a commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// The index matched HEAD; no commit was created
    NothingToCommit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushOptions {
    /// Record the pushed branch as the upstream of the local one
    pub set_upstream: bool,
}

/// Operations against a single working tree.
///
/// Every path argument is relative to the working tree root and uses forward
/// slashes. Implementations do not retry: the first failure is returned.
#[async_trait]
pub trait VcsAdapter: Send + Sync {
    /// Root directory of the working tree
    fn root(&self) -> &Path;

    /// Changed and untracked paths, restricted to `pathspecs` when non-empty.
    async fn status(&self, pathspecs: &[String]) -> Result<Vec<StatusEntry>>;

    /// Unified diff text. Empty when nothing differs.
    async fn diff(&self, args: &DiffArgs) -> Result<String>;

    /// Stage `paths`.
    async fn add(&self, paths: &[String]) -> Result<()>;

    async fn commit(&self, message: &str) -> Result<CommitOutcome>;

    async fn fetch(&self, remote: &str) -> Result<()>;

    /// Merge `remote/branch` into the current branch.
    async fn pull(&self, remote: &str, branch: &str) -> Result<()>;

    async fn push(&self, remote: &str, branch: &str, options: PushOptions) -> Result<()>;

    async fn remotes(&self) -> Result<Vec<RemoteInfo>>;

    async fn add_remote(&self, name: &str, url: &str) -> Result<()>;

    async fn set_remote_url(&self, name: &str, url: &str) -> Result<()>;

    /// Create `name` from the current HEAD and switch to it.
    async fn checkout_new_branch(&self, name: &str) -> Result<()>;

    /// Switch to an existing local branch.
    async fn checkout_branch(&self, name: &str) -> Result<()>;

    /// Restore `paths` in the working tree and index from `reference`.
    async fn checkout_paths(&self, reference: &str, paths: &[String]) -> Result<()>;

    /// Unstage `paths`, leaving the working tree alone.
    async fn reset_paths(&self, paths: &[String]) -> Result<()>;

    /// The checked out branch, or `None` on a detached HEAD.
    async fn current_branch(&self) -> Result<Option<String>>;

    async fn local_branches(&self) -> Result<Vec<String>>;

    /// Whether the index differs from HEAD.
    async fn has_staged_changes(&self) -> Result<bool>;
}

/// Creates adapters and performs operations that precede a working tree.
#[async_trait]
pub trait VcsBackend: Send + Sync {
    /// Bind an adapter to an existing working tree.
    fn open(&self, root: &Path) -> Arc<dyn VcsAdapter>;

    /// Initialize a repository at `root` with `branch` as its initial branch.
    async fn init(&self, root: &Path, branch: &str) -> Result<Arc<dyn VcsAdapter>>;

    /// Clone `url` into `dest`, which must not exist or be empty.
    async fn clone_repository(&self, url: &str, dest: &Path) -> Result<Arc<dyn VcsAdapter>>;
}
