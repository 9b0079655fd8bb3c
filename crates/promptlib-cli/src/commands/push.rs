//! Push command implementation

use chrono::Utc;
use colored::Colorize;
use promptlib_core::SyncService;
use promptlib_core::sync::default_commit_message;

use crate::error::{CliError, Result};
use crate::interactive;

use super::print_change_summary;

/// Run the push command
pub async fn run_push(
    sync: &SyncService,
    branch: Option<&str>,
    message: Option<&str>,
    yes: bool,
) -> Result<()> {
    let plan = sync.prepare_push(branch).await?;

    print_change_summary(&plan.changes);
    println!();

    let interactive = interactive::is_interactive();
    let default_message = default_commit_message(Utc::now());
    let message = match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m.to_string(),
        None if interactive && !yes => interactive::commit_message(&default_message)?,
        None => default_message,
    };

    if !yes {
        if !interactive {
            return Err(CliError::user("Refusing to push without confirmation; pass --yes"));
        }
        let prompt = format!("Push {} change(s) to {}?", plan.changes.len(), plan.branch);
        if !interactive::confirm(&prompt, true)? {
            println!("{} Push cancelled.", "=>".yellow().bold());
            return Ok(());
        }
    }

    println!(
        "{} Pushing to {}...",
        "=>".blue().bold(),
        plan.branch.cyan()
    );
    sync.commit_and_push(&plan.branch, &message).await?;
    println!(
        "{} Pushed {} change(s) to {}",
        "OK".green().bold(),
        plan.changes.len(),
        plan.branch.cyan()
    );

    Ok(())
}
