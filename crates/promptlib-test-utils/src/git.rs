//! Git repository fixtures at three realism levels.
//!
//! Choose the lowest-realism fixture that satisfies the test: fakes are
//! faster and do not need a `git` executable.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `git` in `path` and return trimmed stdout.
///
/// # Panics
/// Panics if git cannot be started or exits non-zero.
pub fn git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed in {}:\n{}",
            path.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Set a local committer identity and disable signing.
pub fn configure_identity(path: &Path) {
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);
}

/// Creates a minimal `.git` directory structure **without** initialising a
/// real git repository.
///
/// Realism level: **FAKE**, directory structure only, no object store.
///
/// Use for: state detection tests that only look for the `.git` marker.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir_all(path.join(".git/refs/heads"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
}

/// Initialises an empty bare repository whose HEAD points at `main`.
///
/// Realism level: **REAL**, usable as the `origin` of other fixtures.
///
/// # Panics
/// Panics if `git2` cannot create the repository.
pub fn bare_remote(path: &Path) -> git2::Repository {
    let repo = git2::Repository::init_bare(path).unwrap_or_else(|e| {
        panic!(
            "bare_remote: failed to init bare repository at {}: {e}",
            path.display()
        )
    });
    repo.set_head("refs/heads/main")
        .unwrap_or_else(|e| panic!("bare_remote: failed to point HEAD at main: {e}"));
    repo
}

/// Initialises a real git repository with an initial commit using the `git`
/// CLI.
///
/// Realism level: **REAL WITH HISTORY**, `main` branch, one commit.
///
/// Specifically:
/// - Runs `git init` and points HEAD at `main` before committing
/// - Configures a local identity with signing disabled
/// - Writes every `(path, content)` pair in `files` and commits them
///
/// # Panics
/// Panics if any git or filesystem operation fails.
pub fn real_git_repo_with_commit(path: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("real_git_repo_with_commit: failed to create dir: {e}"));
    git(path, &["init", "--quiet"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    configure_identity(path);

    for (rel, content) in files {
        let file = path.join(rel);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("real_git_repo_with_commit: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&file, content).unwrap_or_else(|e| {
            panic!("real_git_repo_with_commit: failed to write {rel}: {e}")
        });
    }

    git(path, &["add", "--all"]);
    git(path, &["commit", "--quiet", "--allow-empty", "-m", "Initial commit"]);
}

/// Current HEAD commit id of the repository at `path`.
pub fn head_commit(path: &Path) -> String {
    git(path, &["rev-parse", "HEAD"])
}
