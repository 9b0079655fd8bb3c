//! [`VcsAdapter`] backed by the `git` executable

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;

use async_trait::async_trait;
use promptlib_fs::NormalizedPath;
use tokio::process::Command;

use crate::adapter::{CommitOutcome, PushOptions, VcsAdapter, VcsBackend};
use crate::remote::parse_remote_verbose;
use crate::status::parse_porcelain;
use crate::{DiffArgs, Error, RemoteInfo, Result, StatusEntry};

const GIT: &str = "git";

fn command_line(args: &[String]) -> String {
    format!("{GIT} {}", args.join(" "))
}

fn git_command(cwd: &Path, args: &[String]) -> Command {
    let mut cmd = Command::new(GIT);
    cmd.args(args)
        .current_dir(cwd)
        .env("GIT_TERMINAL_PROMPT", "0")
        .kill_on_drop(true);
    cmd
}

async fn spawn(cwd: &Path, args: &[String]) -> Result<Output> {
    tracing::debug!(cwd = %cwd.display(), command = %command_line(args), "Running git");
    git_command(cwd, args).output().await.map_err(Error::Spawn)
}

fn failure(args: &[String], output: &Output) -> Error {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stderr = if stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr
    };
    Error::CommandFailed {
        command: command_line(args),
        code: output.status.code().unwrap_or(-1),
        stderr,
    }
}

/// Run git and return stdout, failing on a non-zero exit.
async fn run(cwd: &Path, args: &[String]) -> Result<String> {
    let output = spawn(cwd, args).await?;
    if !output.status.success() {
        return Err(failure(args, &output));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn args<const N: usize>(fixed: [&str; N]) -> Vec<String> {
    fixed.iter().map(|s| s.to_string()).collect()
}

fn with_paths(mut base: Vec<String>, paths: &[String]) -> Vec<String> {
    base.push("--".into());
    base.extend(paths.iter().cloned());
    base
}

/// A working tree driven through the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn run(&self, args: Vec<String>) -> Result<String> {
        run(&self.root, &args).await
    }
}

#[async_trait]
impl VcsAdapter for GitCli {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn status(&self, pathspecs: &[String]) -> Result<Vec<StatusEntry>> {
        let mut cmd = args([
            "status",
            "--porcelain=v1",
            "-z",
            "--untracked-files=all",
            "--no-renames",
        ]);
        if !pathspecs.is_empty() {
            cmd = with_paths(cmd, pathspecs);
        }
        let out = self.run(cmd).await?;
        parse_porcelain(&out)
    }

    async fn diff(&self, diff: &DiffArgs) -> Result<String> {
        self.run(diff.to_args()).await
    }

    async fn add(&self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        self.run(with_paths(args(["add", "--all"]), paths)).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<CommitOutcome> {
        let cmd = vec!["commit".to_string(), "-m".to_string(), message.to_string()];
        let output = spawn(&self.root, &cmd).await?;
        if output.status.success() {
            return Ok(CommitOutcome::Committed);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let nothing_staged = ["nothing to commit", "nothing added to commit", "no changes added to commit"];
        if nothing_staged.iter().any(|m| stdout.contains(m)) {
            tracing::debug!("Nothing to commit");
            return Ok(CommitOutcome::NothingToCommit);
        }
        Err(failure(&cmd, &output))
    }

    async fn fetch(&self, remote: &str) -> Result<()> {
        self.run(args(["fetch", remote])).await?;
        Ok(())
    }

    async fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(args(["pull", "--no-rebase", "--no-edit", remote, branch]))
            .await?;
        Ok(())
    }

    async fn push(&self, remote: &str, branch: &str, options: PushOptions) -> Result<()> {
        let cmd = if options.set_upstream {
            args(["push", "--set-upstream", remote, branch])
        } else {
            args(["push", remote, branch])
        };
        self.run(cmd).await?;
        Ok(())
    }

    async fn remotes(&self) -> Result<Vec<RemoteInfo>> {
        let out = self.run(args(["remote", "-v"])).await?;
        Ok(parse_remote_verbose(&out))
    }

    async fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run(args(["remote", "add", name, url])).await?;
        Ok(())
    }

    async fn set_remote_url(&self, name: &str, url: &str) -> Result<()> {
        self.run(args(["remote", "set-url", name, url])).await?;
        Ok(())
    }

    async fn checkout_new_branch(&self, name: &str) -> Result<()> {
        self.run(args(["checkout", "-b", name])).await?;
        Ok(())
    }

    async fn checkout_branch(&self, name: &str) -> Result<()> {
        self.run(args(["checkout", "--quiet", name])).await?;
        Ok(())
    }

    async fn checkout_paths(&self, reference: &str, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        self.run(with_paths(args(["checkout", reference]), paths))
            .await?;
        Ok(())
    }

    async fn reset_paths(&self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        self.run(with_paths(args(["reset", "-q"]), paths)).await?;
        Ok(())
    }

    async fn current_branch(&self) -> Result<Option<String>> {
        let cmd = args(["symbolic-ref", "--quiet", "--short", "HEAD"]);
        let output = spawn(&self.root, &cmd).await?;
        if !output.status.success() {
            return Ok(None);
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!name.is_empty()).then_some(name))
    }

    async fn local_branches(&self) -> Result<Vec<String>> {
        let out = self
            .run(args(["for-each-ref", "--format=%(refname:short)", "refs/heads/"]))
            .await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    async fn has_staged_changes(&self) -> Result<bool> {
        let cmd = args(["diff", "--cached", "--quiet"]);
        let output = spawn(&self.root, &cmd).await?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(failure(&cmd, &output)),
        }
    }
}

/// Creates [`GitCli`] adapters.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitBackend;

#[async_trait]
impl VcsBackend for GitBackend {
    fn open(&self, root: &Path) -> Arc<dyn VcsAdapter> {
        Arc::new(GitCli::new(root))
    }

    async fn init(&self, root: &Path, branch: &str) -> Result<Arc<dyn VcsAdapter>> {
        promptlib_fs::io::ensure_dir(&NormalizedPath::new(root))?;
        let git = GitCli::new(root);
        git.run(args(["init", "--quiet"])).await?;
        // `init -b` needs git 2.28; pointing HEAD works everywhere
        let head_ref = format!("refs/heads/{branch}");
        git.run(args(["symbolic-ref", "HEAD", &head_ref])).await?;
        tracing::info!(root = %root.display(), branch, "Initialized git repository");
        Ok(Arc::new(git))
    }

    async fn clone_repository(&self, url: &str, dest: &Path) -> Result<Arc<dyn VcsAdapter>> {
        let parent = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        promptlib_fs::io::ensure_dir(&NormalizedPath::new(parent))?;
        let target = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dest.to_string_lossy().into_owned());
        run(parent, &args(["clone", "--quiet", url, &target])).await?;
        tracing::info!(url, dest = %dest.display(), "Cloned repository");
        Ok(Arc::new(GitCli::new(dest)))
    }
}
