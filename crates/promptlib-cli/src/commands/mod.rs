//! Command implementations for promptlib-cli

pub mod diff;
pub mod pull;
pub mod push;
pub mod reset;
pub mod setup;
pub mod status;
pub mod sync;

pub use diff::run_diff;
pub use pull::run_pull;
pub use push::run_push;
pub use reset::run_reset;
pub use setup::run_setup;
pub use status::run_status;
pub use sync::run_sync;

use colored::{ColoredString, Colorize};
use promptlib_core::OriginalType;
use promptlib_git::StatusEntry;

/// `Add` green, `Modify` yellow, `Delete` red, padded for alignment.
pub(crate) fn colored_verb(kind: OriginalType) -> ColoredString {
    let verb = format!("{:<8}", kind.verb());
    match kind {
        OriginalType::Added => verb.green(),
        OriginalType::Modified => verb.yellow(),
        OriginalType::Deleted => verb.red(),
    }
}

/// Print one titled block of changes.
pub(crate) fn print_changes(title: &str, entries: &[&StatusEntry]) {
    if entries.is_empty() {
        return;
    }
    println!();
    println!("{}", format!("{title} Changes ({}):", entries.len()).bold());
    for entry in entries {
        println!(
            "   {} {}",
            colored_verb(OriginalType::from_status(entry.status)),
            entry.path
        );
    }
}

/// Print prompts then fragments.
pub(crate) fn print_change_summary(entries: &[StatusEntry]) {
    let (prompts, fragments): (Vec<&StatusEntry>, Vec<&StatusEntry>) =
        entries.iter().partition(|e| e.path.starts_with("prompts/"));
    print_changes("Prompts", &prompts);
    print_changes("Fragments", &fragments);
}

/// Color unified diff lines.
pub(crate) fn print_diff(diff: &str) {
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}
