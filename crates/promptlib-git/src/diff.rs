//! Arguments for `git diff`

/// Which diff to produce.
///
/// ```
/// use promptlib_git::DiffArgs;
///
/// let args = DiffArgs::range("HEAD", "origin/main").paths(["prompts/", "fragments/"]);
/// assert_eq!(
///     args.to_args(),
///     vec!["diff", "HEAD..origin/main", "--", "prompts/", "fragments/"]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffArgs {
    /// Compare the index against HEAD (`--cached`)
    pub staged: bool,
    /// Revision range such as `HEAD..origin/main`
    pub range: Option<String>,
    /// Restrict the diff to these pathspecs
    pub pathspecs: Vec<String>,
}

impl DiffArgs {
    /// Index against HEAD.
    pub fn staged() -> Self {
        Self {
            staged: true,
            ..Default::default()
        }
    }

    /// Working tree against the index.
    pub fn unstaged() -> Self {
        Self::default()
    }

    /// Between two revisions.
    pub fn range(from: &str, to: &str) -> Self {
        Self {
            range: Some(format!("{from}..{to}")),
            ..Default::default()
        }
    }

    pub fn paths<I, S>(mut self, pathspecs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pathspecs = pathspecs.into_iter().map(Into::into).collect();
        self
    }

    /// The git command line, without the `git` program itself.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["diff".to_string()];
        if self.staged {
            args.push("--cached".into());
        }
        if let Some(range) = &self.range {
            args.push(range.clone());
        }
        if !self.pathspecs.is_empty() {
            args.push("--".into());
            args.extend(self.pathspecs.iter().cloned());
        }
        args
    }
}
