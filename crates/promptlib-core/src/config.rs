//! Sync settings and where they come from
//!
//! The engine only reads three values: whether git is used at all, the branch
//! pushes and pulls target, and the remote URL. [`ConfigProvider`] hides where
//! they live so tests can use [`StaticConfig`].

use std::sync::{Mutex, PoisonError};

use promptlib_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Branch used when nothing else is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Environment variables that override file settings.
pub const ENV_USE_GIT: &str = "PROMPTLIB_USE_GIT";
pub const ENV_DEFAULT_BRANCH: &str = "PROMPTLIB_DEFAULT_BRANCH";
pub const ENV_REMOTE_REPOSITORY: &str = "PROMPTLIB_REMOTE_REPOSITORY";

/// Settings consumed by the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub use_git: bool,
    pub default_branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_repository: Option<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            use_git: true,
            default_branch: DEFAULT_BRANCH.to_string(),
            remote_repository: None,
        }
    }
}

impl SyncSettings {
    /// The configured default branch, or `main` when it is blank.
    pub fn branch(&self) -> &str {
        let branch = self.default_branch.trim();
        if branch.is_empty() { DEFAULT_BRANCH } else { branch }
    }

    /// The configured remote URL when it is not blank.
    pub fn remote(&self) -> Option<&str> {
        self.remote_repository
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Apply overrides from `lookup`, normally the process environment.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(ENV_USE_GIT) {
            self.use_git = parse_bool(&raw).ok_or_else(|| Error::Config {
                message: format!("{ENV_USE_GIT} must be true or false, got {raw:?}"),
            })?;
        }
        if let Some(branch) = lookup(ENV_DEFAULT_BRANCH) {
            self.default_branch = branch;
        }
        if let Some(url) = lookup(ENV_REMOTE_REPOSITORY) {
            self.remote_repository = Some(url);
        }
        Ok(self)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read access to settings plus the one value the engine writes back.
pub trait ConfigProvider: Send + Sync {
    fn settings(&self) -> Result<SyncSettings>;

    /// Persist `url` as the remote repository.
    fn set_remote_repository(&self, url: &str) -> Result<()>;
}

/// Settings stored in a TOML, JSON or YAML file, with environment overrides.
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: NormalizedPath,
    store: ConfigStore,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<NormalizedPath>) -> Self {
        Self {
            path: path.into(),
            store: ConfigStore::new(),
        }
    }

    /// `<config dir>/promptlib/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<NormalizedPath> {
        dirs::config_dir().map(|dir| NormalizedPath::new(dir.join("promptlib").join("config.toml")))
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn load_file(&self) -> Result<SyncSettings> {
        Ok(self.store.load_or_default(&self.path)?)
    }
}

impl ConfigProvider for FileConfigProvider {
    fn settings(&self) -> Result<SyncSettings> {
        self.load_file()?
            .with_overrides(|key| std::env::var(key).ok())
    }

    fn set_remote_repository(&self, url: &str) -> Result<()> {
        let mut settings = self.load_file()?;
        settings.remote_repository = Some(url.to_string());
        self.store.save(&self.path, &settings)?;
        tracing::info!(path = %self.path, url, "Saved remote repository");
        Ok(())
    }
}

/// In-memory settings.
#[derive(Debug, Default)]
pub struct StaticConfig {
    settings: Mutex<SyncSettings>,
}

impl StaticConfig {
    pub fn new(settings: SyncSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    /// Git enabled, `main`, remote set to `url`.
    pub fn with_remote(url: &str) -> Self {
        Self::new(SyncSettings {
            remote_repository: Some(url.to_string()),
            ..Default::default()
        })
    }

    pub fn without_git() -> Self {
        Self::new(SyncSettings {
            use_git: false,
            ..Default::default()
        })
    }
}

impl ConfigProvider for StaticConfig {
    fn settings(&self) -> Result<SyncSettings> {
        Ok(self
            .settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set_remote_repository(&self, url: &str) -> Result<()> {
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remote_repository = Some(url.to_string());
        Ok(())
    }
}
