//! Pull command implementation

use colored::Colorize;
use promptlib_core::{Error, PullOutcome, SyncService};

use crate::error::{CliError, Result};
use crate::interactive;

use super::print_diff;

/// Run the pull command
pub async fn run_pull(sync: &SyncService, url: Option<&str>, force: bool) -> Result<()> {
    println!("{} Checking remote for changes...", "=>".blue().bold());

    let outcome = match sync.pull_with_remote(url, force).await {
        Err(Error::NoRemoteConfigured) if interactive::is_interactive() => {
            let Some(url) = interactive::remote_url()? else {
                return Err(Error::NoRemoteConfigured.into());
            };
            sync.set_repo_url(&url)?;
            sync.pull_with_remote(Some(&url), force).await?
        }
        other => other?,
    };

    match outcome {
        PullOutcome::UpToDate => {
            println!("{} Library is up to date.", "OK".green().bold());
        }
        PullOutcome::Pulled => {
            println!("{} Pulled remote changes.", "OK".green().bold());
        }
        PullOutcome::ConfirmationRequired { diff } => {
            println!();
            println!("{}", "Incoming changes:".bold());
            print_diff(&diff);
            println!();

            if !interactive::is_interactive() {
                return Err(CliError::user(
                    "Incoming changes need confirmation; rerun with --force to apply them",
                ));
            }
            if !interactive::confirm("Apply these changes?", true)? {
                println!("{} Pull cancelled.", "=>".yellow().bold());
                return Ok(());
            }
            sync.pull_confirmed().await?;
            println!("{} Pulled remote changes.", "OK".green().bold());
        }
    }

    Ok(())
}
