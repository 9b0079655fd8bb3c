//! [`MockVcs`]: an in-memory [`VcsAdapter`] that records every call.
//!
//! State (status entries, remotes, branches, diffs) is scripted up front;
//! failures can be scripted per operation or per operation and path.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use promptlib_git::{
    CommitOutcome, DiffArgs, Error, PushOptions, RemoteInfo, Result, StatusEntry, VcsAdapter,
    VcsBackend,
};

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub args: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    status: Vec<StatusEntry>,
    remotes: Vec<RemoteInfo>,
    branches: Vec<String>,
    current_branch: Option<String>,
    staged: bool,
    staged_diff: String,
    unstaged_diff: String,
    range_diff: String,
    failing_ops: HashSet<&'static str>,
    failing_paths: HashSet<(&'static str, String)>,
}

/// Recording adapter. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct MockVcs {
    root: PathBuf,
    state: Arc<Mutex<MockState>>,
}

impl MockVcs {
    /// A clean repository on `main` with no remotes.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let state = MockState {
            branches: vec!["main".into()],
            current_branch: Some("main".into()),
            ..Default::default()
        };
        Self {
            root: root.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn with_status(self, entries: Vec<StatusEntry>) -> Self {
        self.state().status = entries;
        self
    }

    pub fn with_origin(self, url: &str) -> Self {
        self.state().remotes.push(RemoteInfo {
            name: "origin".into(),
            fetch_url: url.into(),
            push_url: url.into(),
        });
        self
    }

    pub fn with_staged_diff(self, diff: &str) -> Self {
        self.state().staged_diff = diff.into();
        self
    }

    pub fn with_unstaged_diff(self, diff: &str) -> Self {
        self.state().unstaged_diff = diff.into();
        self
    }

    /// Diff returned for revision ranges such as `HEAD..origin/main`.
    pub fn with_range_diff(self, diff: &str) -> Self {
        self.state().range_diff = diff.into();
        self
    }

    pub fn with_branch(self, name: &str) -> Self {
        {
            let mut state = self.state();
            if !state.branches.iter().any(|b| b == name) {
                state.branches.push(name.into());
            }
            state.current_branch = Some(name.into());
        }
        self
    }

    /// Every call to `op` fails.
    pub fn fail_on(self, op: &'static str) -> Self {
        self.state().failing_ops.insert(op);
        self
    }

    /// Calls to `op` whose arguments include `path` fail.
    pub fn fail_on_path(self, op: &'static str, path: &str) -> Self {
        self.state().failing_paths.insert((op, path.into()));
        self
    }

    pub fn set_status(&self, entries: Vec<StatusEntry>) {
        self.state().status = entries;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Arguments of every call to `op`, in order.
    pub fn calls_to(&self, op: &str) -> Vec<Vec<String>> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.op == op)
            .map(|c| c.args.clone())
            .collect()
    }

    pub fn count(&self, op: &str) -> usize {
        self.state().calls.iter().filter(|c| c.op == op).count()
    }

    pub fn total_calls(&self) -> usize {
        self.state().calls.len()
    }

    pub fn remote_list(&self) -> Vec<RemoteInfo> {
        self.state().remotes.clone()
    }

    fn record(&self, op: &'static str, args: Vec<String>) -> Result<()> {
        let mut state = self.state();
        let fails = state.failing_ops.contains(op)
            || args
                .iter()
                .any(|a| state.failing_paths.contains(&(op, a.clone())));
        state.calls.push(Call {
            op,
            args: args.clone(),
        });
        if fails {
            return Err(Error::CommandFailed {
                command: format!("git {op} {}", args.join(" ")),
                code: 1,
                stderr: format!("scripted failure for {op}"),
            });
        }
        Ok(())
    }
}

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl VcsAdapter for MockVcs {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn status(&self, pathspecs: &[String]) -> Result<Vec<StatusEntry>> {
        self.record("status", pathspecs.to_vec())?;
        let entries = self.state().status.clone();
        if pathspecs.is_empty() {
            return Ok(entries);
        }
        Ok(entries
            .into_iter()
            .filter(|e| pathspecs.iter().any(|p| e.path.starts_with(p.as_str())))
            .collect())
    }

    async fn diff(&self, args: &DiffArgs) -> Result<String> {
        self.record("diff", args.to_args())?;
        let state = self.state();
        Ok(if args.range.is_some() {
            state.range_diff.clone()
        } else if args.staged {
            state.staged_diff.clone()
        } else {
            state.unstaged_diff.clone()
        })
    }

    async fn add(&self, paths: &[String]) -> Result<()> {
        self.record("add", paths.to_vec())?;
        let mut state = self.state();
        if !state.status.is_empty() {
            state.staged = true;
        }
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<CommitOutcome> {
        self.record("commit", strs(&[message]))?;
        let mut state = self.state();
        if !state.staged {
            return Ok(CommitOutcome::NothingToCommit);
        }
        state.staged = false;
        state.status.clear();
        Ok(CommitOutcome::Committed)
    }

    async fn fetch(&self, remote: &str) -> Result<()> {
        self.record("fetch", strs(&[remote]))
    }

    async fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.record("pull", strs(&[remote, branch]))
    }

    async fn push(&self, remote: &str, branch: &str, options: PushOptions) -> Result<()> {
        let mut args = strs(&[remote, branch]);
        if options.set_upstream {
            args.insert(0, "--set-upstream".into());
        }
        self.record("push", args)
    }

    async fn remotes(&self) -> Result<Vec<RemoteInfo>> {
        self.record("remotes", Vec::new())?;
        Ok(self.state().remotes.clone())
    }

    async fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.record("add_remote", strs(&[name, url]))?;
        self.state().remotes.push(RemoteInfo {
            name: name.into(),
            fetch_url: url.into(),
            push_url: url.into(),
        });
        Ok(())
    }

    async fn set_remote_url(&self, name: &str, url: &str) -> Result<()> {
        self.record("set_remote_url", strs(&[name, url]))?;
        if let Some(remote) = self.state().remotes.iter_mut().find(|r| r.name == name) {
            remote.fetch_url = url.into();
            remote.push_url = url.into();
        }
        Ok(())
    }

    async fn checkout_new_branch(&self, name: &str) -> Result<()> {
        self.record("checkout_new_branch", strs(&[name]))?;
        let mut state = self.state();
        state.branches.push(name.into());
        state.current_branch = Some(name.into());
        Ok(())
    }

    async fn checkout_branch(&self, name: &str) -> Result<()> {
        self.record("checkout_branch", strs(&[name]))?;
        self.state().current_branch = Some(name.into());
        Ok(())
    }

    async fn checkout_paths(&self, reference: &str, paths: &[String]) -> Result<()> {
        let mut args = vec![reference.to_string()];
        args.extend(paths.iter().cloned());
        self.record("checkout_paths", args)
    }

    async fn reset_paths(&self, paths: &[String]) -> Result<()> {
        self.record("reset_paths", paths.to_vec())
    }

    async fn current_branch(&self) -> Result<Option<String>> {
        self.record("current_branch", Vec::new())?;
        Ok(self.state().current_branch.clone())
    }

    async fn local_branches(&self) -> Result<Vec<String>> {
        self.record("local_branches", Vec::new())?;
        Ok(self.state().branches.clone())
    }

    async fn has_staged_changes(&self) -> Result<bool> {
        self.record("has_staged_changes", Vec::new())?;
        Ok(self.state().staged)
    }
}

/// Backend handing out one shared [`MockVcs`].
///
/// `init` and `clone_repository` create the target directory with an empty
/// `.git` marker so filesystem-based detection sees a repository.
#[derive(Debug, Clone)]
pub struct MockBackend {
    vcs: MockVcs,
}

impl MockBackend {
    pub fn new(vcs: MockVcs) -> Self {
        Self { vcs }
    }

    pub fn vcs(&self) -> &MockVcs {
        &self.vcs
    }
}

fn mark_repository(root: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(root.join(".git"))
}

#[async_trait]
impl VcsBackend for MockBackend {
    fn open(&self, _root: &Path) -> Arc<dyn VcsAdapter> {
        Arc::new(self.vcs.clone())
    }

    async fn init(&self, root: &Path, branch: &str) -> Result<Arc<dyn VcsAdapter>> {
        self.vcs
            .record("init", vec![root.to_string_lossy().into_owned(), branch.into()])?;
        mark_repository(root).map_err(Error::Spawn)?;
        Ok(Arc::new(self.vcs.clone()))
    }

    async fn clone_repository(&self, url: &str, dest: &Path) -> Result<Arc<dyn VcsAdapter>> {
        self.vcs
            .record("clone", vec![url.into(), dest.to_string_lossy().into_owned()])?;
        mark_repository(dest).map_err(Error::Spawn)?;
        self.vcs.state().remotes.push(RemoteInfo {
            name: "origin".into(),
            fetch_url: url.into(),
            push_url: url.into(),
        });
        Ok(Arc::new(self.vcs.clone()))
    }
}
