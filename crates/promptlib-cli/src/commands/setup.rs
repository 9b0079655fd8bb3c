//! Setup command implementation

use std::path::Path;

use colored::Colorize;
use promptlib_core::SyncService;

use crate::error::Result;

/// Run the setup command
///
/// Exactly one of `remote` and `local` is given (enforced by clap).
pub async fn run_setup(
    sync: &mut SyncService,
    remote: Option<&str>,
    local: Option<&Path>,
) -> Result<()> {
    if let Some(url) = remote {
        println!("{} Setting up library from {}...", "=>".blue().bold(), url.cyan());
        let base = sync.state_mut().setup_from_remote_url(url).await?;
        sync.set_repo_url(url)?;
        println!("{} Library ready at {}", "OK".green().bold(), base.to_string().cyan());
        return Ok(());
    }

    if let Some(dir) = local {
        println!(
            "{} Setting up library from {}...",
            "=>".blue().bold(),
            dir.display().to_string().cyan()
        );
        let setup = sync.state_mut().setup_from_local_directory(dir).await?;
        if let Some(url) = &setup.url {
            sync.set_repo_url(url)?;
            println!("   {} remote {}", "+".green(), url.cyan());
        }
        println!(
            "{} Library ready at {}",
            "OK".green().bold(),
            setup.path.to_string().cyan()
        );
    }

    Ok(())
}
