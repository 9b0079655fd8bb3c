//! Sync command implementation

use colored::Colorize;
use promptlib_core::SyncService;

use crate::error::Result;
use crate::interactive;

use super::print_change_summary;

/// Run the sync command
///
/// Without `--yes` on a non-terminal, the offer is declined.
pub async fn run_sync(sync: &SyncService, yes: bool) -> Result<()> {
    let mut prompt_error = None;
    let pushed = sync
        .offer_remote_sync(|plan| {
            print_change_summary(&plan.changes);
            println!();
            if yes {
                return true;
            }
            if !interactive::is_interactive() {
                return false;
            }
            let prompt = format!(
                "Push {} change(s) to {}?",
                plan.changes.len(),
                plan.branch
            );
            match interactive::confirm(&prompt, true) {
                Ok(answer) => answer,
                Err(e) => {
                    prompt_error = Some(e);
                    false
                }
            }
        })
        .await?;

    if let Some(e) = prompt_error {
        return Err(e);
    }

    if pushed {
        println!("{} Changes synced to remote.", "OK".green().bold());
    } else {
        println!("{} Nothing synced.", "=>".blue().bold());
    }
    Ok(())
}
