//! [`TestLibrary`] builder for prompt library scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git;

/// Files committed by [`TestLibrary::with_committed_content`].
pub const SEED_FILES: &[(&str, &str)] = &[
    ("prompts/foo/bar.md", "# Bar\n\nOriginal prompt body.\n"),
    ("prompts/greeting/prompt.md", "Say hello to {{name}}.\n"),
    ("fragments/common/tone.md", "Be concise.\n"),
];

/// A temporary directory holding a library at `<tmp>/library`.
///
/// The library lives one level below the temp root so setup paths can start
/// from a missing directory.
pub struct TestLibrary {
    temp_dir: TempDir,
}

impl Default for TestLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLibrary {
    /// A temp dir whose library directory does not exist yet.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// A library that is a git repo on `main` with [`SEED_FILES`] committed.
    pub fn with_committed_content() -> Self {
        let lib = Self::new();
        git::real_git_repo_with_commit(&lib.base(), SEED_FILES);
        lib
    }

    /// Like [`Self::with_committed_content`] and pushed to a bare `origin`
    /// living at [`Self::remote_path`].
    pub fn with_remote() -> Self {
        let lib = Self::with_committed_content();
        git::bare_remote(&lib.remote_path());
        let remote = lib.remote_url();
        lib.git(&["remote", "add", "origin", &remote]);
        lib.git(&["push", "--quiet", "--set-upstream", "origin", "main"]);
        lib
    }

    /// Temp root, parent of the library and of the bare remote.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The library base directory.
    pub fn base(&self) -> PathBuf {
        self.root().join("library")
    }

    pub fn remote_path(&self) -> PathBuf {
        self.root().join("remote.git")
    }

    pub fn remote_url(&self) -> String {
        self.remote_path().to_string_lossy().into_owned()
    }

    /// Create the content directories without git.
    pub fn create_content_dirs(&self) {
        fs::create_dir_all(self.base().join("prompts")).unwrap();
        fs::create_dir_all(self.base().join("fragments")).unwrap();
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.base().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.base().join(rel))
            .unwrap_or_else(|e| panic!("TestLibrary::read: {rel}: {e}"))
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.base().join(rel)).unwrap();
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.base().join(rel).exists()
    }

    /// Run git inside the library.
    pub fn git(&self, args: &[&str]) -> String {
        git::git(&self.base(), args)
    }

    /// `git status --porcelain` of the library, empty when clean.
    pub fn porcelain(&self) -> String {
        self.git(&["status", "--porcelain", "--untracked-files=all"])
    }

    pub fn assert_file_exists(&self, rel: &str) {
        assert!(
            self.exists(rel),
            "Expected file to exist: {}",
            self.base().join(rel).display()
        );
    }

    pub fn assert_file_missing(&self, rel: &str) {
        assert!(
            !self.exists(rel),
            "Expected file to be absent: {}",
            self.base().join(rel).display()
        );
    }
}
