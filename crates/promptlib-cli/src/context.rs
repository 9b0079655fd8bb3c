//! Wiring the sync service from command-line options

use std::path::{Path, PathBuf};
use std::sync::Arc;

use promptlib_core::{FileConfigProvider, NoopDatabaseSync, RepositoryState, SyncService};
use promptlib_fs::{LibraryLayout, NormalizedPath};
use promptlib_git::GitBackend;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// `--library`, `PROMPTLIB_HOME`, or `<data dir>/promptlib`.
pub fn library_base(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.library {
        return Ok(dir.clone());
    }
    dirs::data_dir()
        .map(|dir| dir.join("promptlib"))
        .ok_or_else(|| CliError::user("Could not determine a data directory; pass --library"))
}

/// `--config`, `PROMPTLIB_CONFIG`, the platform config dir, or the library's
/// own `.config/` as a last resort.
pub fn config_path(cli: &Cli, base: &Path) -> NormalizedPath {
    if let Some(path) = &cli.config {
        return NormalizedPath::new(path);
    }
    FileConfigProvider::default_path()
        .unwrap_or_else(|| NormalizedPath::new(base.join(".config").join("config.toml")))
}

/// Build the sync service for the library selected on the command line.
pub fn sync_service(cli: &Cli) -> Result<SyncService> {
    let base = library_base(cli)?;
    let config = FileConfigProvider::new(config_path(cli, &base));
    tracing::debug!(library = %base.display(), config = %config.path(), "Using library");

    let state = RepositoryState::new(
        LibraryLayout::new(base),
        Arc::new(config),
        Arc::new(GitBackend),
    );
    Ok(SyncService::new(state, Arc::new(NoopDatabaseSync)))
}
