//! Library layout: where content lives below the base directory

use crate::{ContentRoot, LibraryPath, NormalizedPath, Result, io};

/// Path conventions for one prompt library.
///
/// ```text
/// <base>/
///   .git/
///   .gitignore
///   prompts/<prompt-dir>/...
///   fragments/<category>/<name>.md
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLayout {
    base: NormalizedPath,
}

impl LibraryLayout {
    pub fn new(base: impl Into<NormalizedPath>) -> Self {
        Self { base: base.into() }
    }

    /// The library base directory (the git working tree).
    pub fn base(&self) -> &NormalizedPath {
        &self.base
    }

    pub fn content_dir(&self, root: ContentRoot) -> NormalizedPath {
        self.base.join(root.as_str())
    }

    pub fn prompts_dir(&self) -> NormalizedPath {
        self.content_dir(ContentRoot::Prompts)
    }

    pub fn fragments_dir(&self) -> NormalizedPath {
        self.content_dir(ContentRoot::Fragments)
    }

    pub fn git_dir(&self) -> NormalizedPath {
        self.base.join(LibraryPath::GitDir.as_str())
    }

    pub fn gitignore(&self) -> NormalizedPath {
        self.base.join(LibraryPath::Gitignore.as_str())
    }

    /// Absolute path of a prompt directory.
    pub fn prompt_path(&self, prompt_dir: &str) -> NormalizedPath {
        self.prompts_dir().join(prompt_dir)
    }

    /// Absolute path of a fragment file (`<category>/<name>.md`).
    pub fn fragment_path(&self, category: &str, name: &str) -> NormalizedPath {
        self.fragments_dir().join(category).join(format!("{name}.md"))
    }

    /// Absolute path for a path relative to the library base.
    pub fn resolve(&self, relative: &str) -> NormalizedPath {
        self.base.join(relative)
    }

    pub fn base_exists(&self) -> bool {
        self.base.is_dir()
    }

    /// Whether both content roots exist on disk.
    pub fn content_dirs_exist(&self) -> bool {
        ContentRoot::ALL
            .iter()
            .all(|root| self.content_dir(*root).is_dir())
    }

    /// Whether the base directory carries git metadata.
    pub fn has_git_dir(&self) -> bool {
        self.base_exists() && self.git_dir().exists()
    }

    /// Create the base directory and both content roots.
    pub fn ensure_content_dirs(&self) -> Result<()> {
        io::ensure_dir(&self.base)?;
        for root in ContentRoot::ALL {
            io::ensure_dir(&self.content_dir(root))?;
        }
        Ok(())
    }
}
