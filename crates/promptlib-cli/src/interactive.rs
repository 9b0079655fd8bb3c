//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based confirmation and selection. Callers
//! check [`is_interactive`] first and fall back to flags when stdin is not a
//! terminal.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input, MultiSelect};
use promptlib_core::ChangeRecord;

use crate::error::Result;

pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Ask for a commit message, offering `default`.
pub fn commit_message(default: &str) -> Result<String> {
    let message: String = Input::new()
        .with_prompt("Commit message")
        .default(default.to_string())
        .interact_text()?;
    Ok(message)
}

/// Ask for a remote URL. `None` when left blank.
pub fn remote_url() -> Result<Option<String>> {
    let url: String = Input::new()
        .with_prompt("Remote repository URL")
        .allow_empty(true)
        .interact_text()?;
    let url = url.trim();
    Ok((!url.is_empty()).then(|| url.to_string()))
}

/// Let the user pick which changes to reset. Returns the chosen records.
pub fn select_changes(records: &[ChangeRecord]) -> Result<Vec<ChangeRecord>> {
    let labels: Vec<String> = records.iter().map(ToString::to_string).collect();
    let chosen = MultiSelect::new()
        .with_prompt("Select changes to reset (space to toggle, enter to confirm)")
        .items(&labels)
        .interact()?;
    Ok(chosen.into_iter().map(|i| records[i].clone()).collect())
}
