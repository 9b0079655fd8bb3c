//! Reset command implementation

use colored::Colorize;
use promptlib_core::SyncService;

use crate::error::{CliError, Result};
use crate::interactive;

use super::colored_verb;

/// Run the reset command
pub async fn run_reset(sync: &SyncService, all: bool, yes: bool) -> Result<()> {
    let plan = sync.prepare_reset().await?;
    let interactive = interactive::is_interactive();

    let records = if all {
        plan.all()
    } else if interactive {
        interactive::select_changes(&plan.all())?
    } else {
        return Err(CliError::user(
            "Choosing changes needs a terminal; pass --all to reset everything",
        ));
    };

    if records.is_empty() {
        println!("{} Nothing selected.", "=>".yellow().bold());
        return Ok(());
    }

    println!("{}", format!("Changes to reset ({}):", records.len()).bold());
    for record in &records {
        println!("   {} {}", colored_verb(record.original_type), record.repo_path());
    }
    println!();

    if !yes {
        if !interactive {
            return Err(CliError::user("Refusing to reset without confirmation; pass --yes"));
        }
        if !interactive::confirm("Discard these changes?", false)? {
            println!("{} Reset cancelled.", "=>".yellow().bold());
            return Ok(());
        }
    }

    let result = sync.reset_changes(&records).await?;
    if result.fail_count == 0 {
        println!(
            "{} Reset {} change(s)",
            "OK".green().bold(),
            result.success_count
        );
    } else {
        println!(
            "{} Reset {} change(s), {} failed",
            "!!".yellow().bold(),
            result.success_count,
            result.fail_count
        );
    }

    Ok(())
}
