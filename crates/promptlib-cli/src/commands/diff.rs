//! Diff command implementation

use promptlib_core::{NO_CHANGES_DIFF, SyncService};

use crate::error::Result;

use super::print_diff;

/// Run the diff command
pub async fn run_diff(sync: &SyncService) -> Result<()> {
    let diff = sync.state().get_diff().await?;
    if diff == NO_CHANGES_DIFF {
        println!("{diff}");
    } else {
        print_diff(&diff);
    }
    Ok(())
}
