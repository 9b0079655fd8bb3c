//! Status command implementation

use colored::Colorize;
use promptlib_core::{ChangeRecord, SyncService};

use crate::error::Result;

use super::print_change_summary;

/// Run the status command
pub async fn run_status(sync: &SyncService, json: bool) -> Result<()> {
    let state = sync.state();
    let setup = state.is_setup()?;
    let info = state.repository_info().await?;
    let changes = state.list_changes().await?;

    if json {
        let output = serde_json::json!({
            "library": state.layout().base().as_str(),
            "setup": setup,
            "branch": info.branch,
            "remote": info.url,
            "changes": changes
                .iter()
                .map(|entry| {
                    let record = ChangeRecord::classify(entry);
                    serde_json::json!({
                        "path": entry.path,
                        "status": entry.status.to_string(),
                        "kind": record.as_ref().map(|r| r.kind),
                        "reset": record.as_ref().map(|r| r.reset_type),
                    })
                })
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !setup {
        println!("{}", "Library not set up".red().bold());
        println!();
        println!("Run {} to create it.", "promptlib setup".cyan());
        return Ok(());
    }

    println!("{}", "Prompt Library Status".bold());
    println!();
    println!("{}:   {}", "Path".dimmed(), state.layout().base());
    println!(
        "{}: {}",
        "Branch".dimmed(),
        info.branch.as_deref().unwrap_or("(none)").cyan()
    );
    println!(
        "{}: {}",
        "Remote".dimmed(),
        info.url.as_deref().unwrap_or("(none)").cyan()
    );

    if changes.is_empty() {
        println!();
        println!("{} No pending changes.", "OK".green().bold());
    } else {
        print_change_summary(&changes);
    }

    Ok(())
}
