//! Repository state: setup detection, change queries and git plumbing
//!
//! [`RepositoryState`] owns the library layout and an optional adapter bound
//! to the library's working tree. The adapter exists exactly when the library
//! directory contains `.git`; [`RepositoryState::reinitialize`] re-derives it
//! after anything that creates or removes the repository.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use chrono::Utc;
use promptlib_fs::{ContentRoot, LibraryLayout, NormalizedPath, io};
use promptlib_git::{
    CommitOutcome, DiffArgs, ORIGIN, PushOptions, StatusEntry, VcsAdapter, VcsBackend,
};
use regex::Regex;
use serde::Serialize;

use crate::changes::{content_entries, stays_within};
use crate::config::{ConfigProvider, SyncSettings};
use crate::sync::default_commit_message;
use crate::{Error, Result};

/// Returned by [`RepositoryState::get_diff`] when nothing differs.
pub const NO_CHANGES_DIFF: &str = "No changes detected in prompts or fragments";

const GITIGNORE_HEADER: &str = "# Prompt Library .gitignore";

const GITIGNORE_ENTRIES: &[&str] = &[
    ".config/",
    "coverage/",
    "dist/",
    "node_modules/",
    "temp/",
    "temp_types/",
    "*.db",
    "*.sqlite",
    "*.sqlite3",
    ".env",
    "*.log",
    "npm-debug.log*",
    "yarn-debug.log*",
    "yarn-error.log*",
    ".idea/",
    ".vscode/",
    "*.swp",
    "*.swo",
    ".DS_Store",
];

static INVALID_BRANCH_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_\-/]").expect("valid branch pattern"));

/// Replace every character git-unfriendly in a branch name with `-`.
pub fn sanitize_branch_name(name: &str) -> String {
    INVALID_BRANCH_CHARS.replace_all(name, "-").into_owned()
}

/// Branch and `origin` fetch URL of the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryInfo {
    pub branch: Option<String>,
    pub url: Option<String>,
}

/// Result of [`RepositoryState::setup_from_local_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSetup {
    /// Library base directory
    pub path: NormalizedPath,
    /// `origin` URL inherited from the source repository
    pub url: Option<String>,
}

/// State of the prompt library repository.
pub struct RepositoryState {
    layout: LibraryLayout,
    config: Arc<dyn ConfigProvider>,
    backend: Arc<dyn VcsBackend>,
    vcs: Option<Arc<dyn VcsAdapter>>,
}

impl std::fmt::Debug for RepositoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryState")
            .field("layout", &self.layout)
            .field("initialized", &self.vcs.is_some())
            .finish()
    }
}

impl RepositoryState {
    /// Create the state and bind an adapter if the library already has `.git`.
    pub fn new(
        layout: LibraryLayout,
        config: Arc<dyn ConfigProvider>,
        backend: Arc<dyn VcsBackend>,
    ) -> Self {
        let mut state = Self {
            layout,
            config,
            backend,
            vcs: None,
        };
        state.reinitialize();
        state
    }

    /// Re-derive the adapter handle from the filesystem. Returns whether one
    /// is bound afterwards.
    pub fn reinitialize(&mut self) -> bool {
        self.vcs = self
            .layout
            .has_git_dir()
            .then(|| self.backend.open(&self.layout.base().to_native()));
        tracing::debug!(
            base = %self.layout.base(),
            initialized = self.vcs.is_some(),
            "Repository state initialized"
        );
        self.vcs.is_some()
    }

    pub fn layout(&self) -> &LibraryLayout {
        &self.layout
    }

    pub fn config(&self) -> &Arc<dyn ConfigProvider> {
        &self.config
    }

    pub fn settings(&self) -> Result<SyncSettings> {
        self.config.settings()
    }

    pub fn is_initialized(&self) -> bool {
        self.vcs.is_some()
    }

    /// Base and content directories exist, and with git enabled the
    /// repository is initialized.
    pub fn is_setup(&self) -> Result<bool> {
        if !self.layout.base_exists() {
            tracing::debug!(base = %self.layout.base(), "Library directory missing");
            return Ok(false);
        }
        if !self.layout.content_dirs_exist() {
            tracing::debug!("Prompts or fragments directory missing");
            return Ok(false);
        }
        if !self.settings()?.use_git {
            tracing::debug!("Git disabled, setup judged by directories only");
            return Ok(true);
        }
        Ok(self.is_initialized())
    }

    /// Adapter for operations that only need a repository.
    fn adapter(&self) -> Result<&Arc<dyn VcsAdapter>> {
        if !self.settings()?.use_git {
            return Err(Error::GitDisabled);
        }
        self.vcs.as_ref().ok_or(Error::NotInitialized)
    }

    /// Adapter for operations on a fully set up library.
    fn ready(&self) -> Result<&Arc<dyn VcsAdapter>> {
        if !self.is_setup()? {
            return Err(Error::NotSetUp);
        }
        self.adapter()
    }

    /// Adapter for read-only queries, `None` when they should report nothing.
    fn probe(&self) -> Result<Option<&Arc<dyn VcsAdapter>>> {
        if !self.is_setup()? || !self.settings()?.use_git {
            return Ok(None);
        }
        Ok(self.vcs.as_ref())
    }

    pub fn prompt_path(&self, prompt_dir: &str) -> NormalizedPath {
        self.layout.prompt_path(prompt_dir)
    }

    pub fn fragment_path(&self, category: &str, name: &str) -> NormalizedPath {
        self.layout.fragment_path(category, name)
    }

    pub async fn repository_info(&self) -> Result<RepositoryInfo> {
        let Some(vcs) = self.vcs.as_ref() else {
            return Ok(RepositoryInfo::default());
        };
        Ok(RepositoryInfo {
            branch: vcs.current_branch().await?,
            url: self.origin_url().await?,
        })
    }

    async fn origin_url(&self) -> Result<Option<String>> {
        let Some(vcs) = self.vcs.as_ref() else {
            return Ok(None);
        };
        Ok(vcs
            .remotes()
            .await?
            .into_iter()
            .find(|r| r.name == ORIGIN)
            .map(|r| r.fetch_url)
            .filter(|url| !url.is_empty()))
    }

    pub async fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.adapter()?.current_branch().await?)
    }

    pub async fn local_branches(&self) -> Result<Vec<String>> {
        Ok(self.adapter()?.local_branches().await?)
    }

    /// Create a branch from HEAD and switch to it. Returns the sanitized name.
    pub async fn create_and_checkout_branch(&self, name: &str) -> Result<String> {
        let branch = sanitize_branch_name(name);
        self.adapter()?.checkout_new_branch(&branch).await?;
        tracing::info!(branch = %branch, "Created branch");
        Ok(branch)
    }

    pub async fn checkout_branch(&self, name: &str) -> Result<()> {
        self.adapter()?.checkout_branch(name).await?;
        tracing::info!(branch = name, "Switched branch");
        Ok(())
    }

    /// Clone `url` into the library, or point an existing repository's
    /// `origin` at it and fetch.
    pub async fn setup_from_remote_url(&mut self, url: &str) -> Result<NormalizedPath> {
        if !self.settings()?.use_git {
            return Err(Error::GitDisabled);
        }

        if self.layout.has_git_dir() {
            tracing::warn!(base = %self.layout.base(), "Repository already exists, updating origin");
            self.reinitialize();
            self.ensure_origin(url).await?;
            self.adapter()?.fetch(ORIGIN).await?;
        } else {
            self.clone_repository(url).await?;
        }

        self.layout.ensure_content_dirs()?;
        self.ensure_gitignore()?;
        Ok(self.layout.base().clone())
    }

    /// Seed the library from the `prompts/` and `fragments/` of `source`.
    pub async fn setup_from_local_directory(&mut self, source: &Path) -> Result<LocalSetup> {
        let source = io::canonicalize_existing(source).map_err(|e| match e {
            promptlib_fs::Error::PathNotFound { path } => Error::PathNotFound { path },
            other => other.into(),
        })?;
        let use_git = self.settings()?.use_git;

        let mut url = None;
        if use_git {
            if !self.is_initialized() {
                self.init_repository().await?;
            } else {
                tracing::info!(base = %self.layout.base(), "Repository already exists");
            }
            if source.join(".git").exists() {
                url = self.copy_remote_configuration(&source).await;
            }
        }

        self.layout.ensure_content_dirs()?;
        for root in ContentRoot::ALL {
            let from = source.join(root.as_str());
            if from.is_dir() {
                let copied = io::copy_dir_all(&from, &self.layout.content_dir(root).to_native())?;
                tracing::info!(root = %root, files = copied, source = %from.display(), "Copied content");
            } else {
                tracing::warn!(root = %root, source = %from.display(), "No content directory in source");
            }
        }
        self.ensure_gitignore()?;

        if use_git {
            match self.adapter()?.add(&[".".to_string()]).await {
                Ok(()) => tracing::info!("Staged all changes"),
                Err(e) => tracing::warn!(error = %e, "Failed to stage copied content"),
            }
        }

        Ok(LocalSetup {
            path: self.layout.base().clone(),
            url,
        })
    }

    /// Point our `origin` at the source repository's `origin`. Failures are
    /// logged and yield `None`.
    async fn copy_remote_configuration(&self, source: &Path) -> Option<String> {
        let remotes = match self.backend.open(source).remotes().await {
            Ok(remotes) => remotes,
            Err(e) => {
                tracing::warn!(error = %e, source = %source.display(), "Could not read source remotes");
                return None;
            }
        };
        let url = remotes
            .into_iter()
            .find(|r| r.name == ORIGIN)
            .map(|r| r.fetch_url)
            .filter(|url| !url.is_empty())?;

        if let Err(e) = self.ensure_origin(&url).await {
            tracing::warn!(error = %e, url = %url, "Could not copy origin from source");
            return None;
        }
        Some(url)
    }

    /// `git init` the library with the configured default branch.
    pub async fn init_repository(&mut self) -> Result<()> {
        let branch = self.settings()?.branch().to_string();
        let base = self.layout.base().to_native();
        self.vcs = Some(self.backend.init(&base, &branch).await?);
        Ok(())
    }

    /// Clone `url` into the library directory.
    pub async fn clone_repository(&mut self, url: &str) -> Result<()> {
        tracing::info!(url, base = %self.layout.base(), "Cloning library");
        let base = self.layout.base().to_native();
        self.vcs = Some(self.backend.clone_repository(url, &base).await?);
        Ok(())
    }

    /// Write the baseline ignore entries, appending only missing ones.
    /// Returns how many lines were added.
    pub fn ensure_gitignore(&self) -> Result<usize> {
        let added = io::ensure_lines(&self.layout.gitignore(), GITIGNORE_HEADER, GITIGNORE_ENTRIES)?;
        if added > 0 {
            tracing::info!(entries = added, "Updated .gitignore");
        }
        Ok(added)
    }

    /// Pending changes under the content roots. Empty when the library is
    /// not set up, git is disabled or there is no repository.
    pub async fn list_changes(&self) -> Result<Vec<StatusEntry>> {
        let Some(vcs) = self.probe()? else {
            return Ok(Vec::new());
        };
        let entries = vcs.status(&ContentRoot::pathspecs()).await?;
        Ok(content_entries(entries))
    }

    pub async fn count_pending_changes(&self) -> Result<usize> {
        Ok(self.list_changes().await?.len())
    }

    pub async fn has_changes(&self) -> Result<bool> {
        Ok(self.count_pending_changes().await? > 0)
    }

    pub async fn stage_all(&self) -> Result<()> {
        self.ready()?.add(&ContentRoot::pathspecs()).await?;
        Ok(())
    }

    pub async fn stage_prompt(&self, prompt_dir: &str) -> Result<()> {
        let rel = format!("{}{prompt_dir}", ContentRoot::Prompts.prefix());
        self.stage_existing(&rel).await
    }

    /// Stage one fragment, or a whole category when `name` is `None`.
    pub async fn stage_fragment(&self, category: &str, name: Option<&str>) -> Result<()> {
        let rel = match name {
            Some(name) => format!("{}{category}/{name}.md", ContentRoot::Fragments.prefix()),
            None => format!("{}{category}", ContentRoot::Fragments.prefix()),
        };
        self.stage_existing(&rel).await
    }

    async fn stage_existing(&self, rel: &str) -> Result<()> {
        let vcs = self.ready()?;
        if !self.layout.resolve(rel).exists() {
            tracing::info!(path = rel, "Nothing to stage, path does not exist");
            return Ok(());
        }
        vcs.add(&[rel.to_string()]).await?;
        tracing::debug!(path = rel, "Staged");
        Ok(())
    }

    pub async fn commit(&self, message: &str) -> Result<CommitOutcome> {
        let outcome = self.ready()?.commit(message).await?;
        match outcome {
            CommitOutcome::Committed => tracing::info!(message, "Committed"),
            CommitOutcome::NothingToCommit => tracing::info!("Nothing to commit"),
        }
        Ok(outcome)
    }

    /// Push `branch` (or the current branch) to `origin` as is.
    pub async fn push_changes(&self, branch: Option<&str>) -> Result<()> {
        let vcs = self.ready()?;
        if !self.has_remote(ORIGIN).await? {
            return Err(Error::NoRemoteConfigured);
        }
        let branch = match branch {
            Some(b) => b.to_string(),
            None => match vcs.current_branch().await? {
                Some(current) => current,
                None => self.settings()?.branch().to_string(),
            },
        };
        vcs.push(ORIGIN, &branch, PushOptions::default()).await?;
        tracing::info!(branch = %branch, "Pushed");
        Ok(())
    }

    /// Commit pending content on the target branch and push it to the
    /// configured remote with upstream tracking. Returns the branch pushed.
    pub async fn push_to_remote(&self, branch: Option<&str>, message: Option<&str>) -> Result<String> {
        let vcs = self.ready()?;
        let settings = self.settings()?;
        let branch = branch
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(settings.branch())
            .to_string();
        let remote = settings.remote().ok_or(Error::NoRemoteConfigured)?;

        if vcs.current_branch().await?.as_deref() != Some(branch.as_str()) {
            if vcs.local_branches().await?.contains(&branch) {
                vcs.checkout_branch(&branch).await?;
                tracing::info!(branch = %branch, "Switched branch");
            } else {
                vcs.checkout_new_branch(&branch).await?;
                tracing::info!(branch = %branch, "Created branch");
            }
        }

        if self.has_changes().await? {
            vcs.add(&ContentRoot::pathspecs()).await?;
            tracing::info!("Staged prompts and fragments");
            if vcs.has_staged_changes().await? {
                let message = message
                    .map(String::from)
                    .unwrap_or_else(|| default_commit_message(Utc::now()));
                vcs.commit(&message).await?;
                tracing::info!(message = %message, "Committed");
            } else {
                tracing::info!("No staged changes to commit");
            }
        } else {
            tracing::info!("No content changes to commit");
        }

        self.ensure_origin(remote).await?;
        vcs.push(ORIGIN, &branch, PushOptions { set_upstream: true })
            .await?;
        tracing::info!(branch = %branch, remote, "Pushed");
        Ok(branch)
    }

    /// Diff of pending content changes.
    ///
    /// Stages the content roots first so new files show up, then falls back
    /// to the unstaged diff and finally to [`NO_CHANGES_DIFF`].
    pub async fn get_diff(&self) -> Result<String> {
        let vcs = self.ready()?;
        let specs = ContentRoot::pathspecs();

        if let Err(e) = vcs.add(&specs).await {
            tracing::warn!(error = %e, "Failed to stage content before diff");
        }

        let staged = vcs.diff(&DiffArgs::staged().paths(specs.clone())).await?;
        if !staged.trim().is_empty() {
            return Ok(staged);
        }
        let unstaged = vcs.diff(&DiffArgs::unstaged().paths(specs)).await?;
        if !unstaged.trim().is_empty() {
            return Ok(unstaged);
        }
        Ok(NO_CHANGES_DIFF.to_string())
    }

    pub async fn has_remote(&self, name: &str) -> Result<bool> {
        Ok(self
            .adapter()?
            .remotes()
            .await?
            .iter()
            .any(|r| r.name == name))
    }

    pub async fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.adapter()?.add_remote(name, url).await?;
        tracing::info!(name, url, "Added remote");
        Ok(())
    }

    /// Make `origin` point at `url`, adding it when missing.
    async fn ensure_origin(&self, url: &str) -> Result<()> {
        let vcs = self.adapter()?;
        match vcs.remotes().await?.into_iter().find(|r| r.name == ORIGIN) {
            Some(origin) if origin.points_to(url) => {}
            Some(_) => {
                tracing::warn!(url, "Origin differs from configured remote, updating");
                vcs.set_remote_url(ORIGIN, url).await?;
            }
            None => {
                vcs.add_remote(ORIGIN, url).await?;
                tracing::info!(url, "Added origin");
            }
        }
        Ok(())
    }

    /// Fetch `origin`, first reconciling it with `url` or the configured
    /// remote.
    pub async fn fetch_from_remote(&self, url: Option<&str>) -> Result<()> {
        let vcs = self.adapter()?;
        let settings = self.settings()?;
        let url = url.or(settings.remote());

        if let Some(url) = url {
            self.ensure_origin(url).await?;
        } else if !self.has_remote(ORIGIN).await? {
            return Err(Error::NoRemoteConfigured);
        } else {
            tracing::debug!("Fetching existing origin");
        }

        vcs.fetch(ORIGIN).await?;
        Ok(())
    }

    async fn require_origin(&self) -> Result<&Arc<dyn VcsAdapter>> {
        if !self.has_remote(ORIGIN).await? {
            return Err(Error::NoRemoteConfigured);
        }
        self.adapter()
    }

    /// Merge `origin/<branch>` into the current branch.
    pub async fn pull_changes(&self, branch: &str) -> Result<()> {
        self.require_origin().await?.pull(ORIGIN, branch).await?;
        tracing::info!(branch, "Pulled from origin");
        Ok(())
    }

    /// Fetch and diff `HEAD..origin/<branch>` over the content roots.
    pub async fn remote_diff(&self, branch: &str) -> Result<String> {
        self.require_origin().await?.fetch(ORIGIN).await?;
        self.incoming_diff(branch).await
    }

    /// Diff `HEAD..origin/<branch>` over the content roots without fetching.
    pub async fn incoming_diff(&self, branch: &str) -> Result<String> {
        let remote_ref = format!("{ORIGIN}/{branch}");
        let args = DiffArgs::range("HEAD", &remote_ref).paths(ContentRoot::pathspecs());
        Ok(self.require_origin().await?.diff(&args).await?)
    }

    /// `checkout HEAD -- <path>`
    pub async fn restore_path(&self, path: &str) -> Result<()> {
        self.ready()?
            .checkout_paths("HEAD", &[path.to_string()])
            .await?;
        Ok(())
    }

    /// `reset -- <path>`
    pub async fn unstage_path(&self, path: &str) -> Result<()> {
        self.ready()?.reset_paths(&[path.to_string()]).await?;
        Ok(())
    }

    /// Remove an added file or directory and any directories the removal left
    /// empty, stopping at its content root. Returns whether anything existed.
    ///
    /// Paths outside `prompts/` and `fragments/` are refused.
    pub fn discard_added_path(&self, path: &str) -> Result<bool> {
        let Some((root, _)) = ContentRoot::split(path).filter(|(_, rest)| stays_within(rest)) else {
            return Err(Error::OutsideContentRoots {
                path: path.to_string(),
            });
        };
        let stop = self.layout.content_dir(root);
        let target = self.layout.resolve(path);
        let removed = io::remove_path(&target)?;

        let mut dir = target.parent();
        while let Some(current) = dir {
            if current == stop || !current.as_str().starts_with(stop.as_str()) {
                break;
            }
            // only succeeds on empty directories
            if std::fs::remove_dir(current.to_native()).is_err() {
                break;
            }
            dir = current.parent();
        }

        Ok(removed)
    }
}
