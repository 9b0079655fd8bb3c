//! Metadata database collaborator
//!
//! The database indexes prompt and fragment files. Every operation that
//! changes content on disk (pull, reset, push) asks it to re-scan once.

use async_trait::async_trait;

use crate::Result;

/// Re-scans the library into the metadata database.
#[async_trait]
pub trait DatabaseSync: Send + Sync {
    async fn sync_prompts_with_file_system(&self) -> Result<()>;
}

/// Used when no database is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDatabaseSync;

#[async_trait]
impl DatabaseSync for NoopDatabaseSync {
    async fn sync_prompts_with_file_system(&self) -> Result<()> {
        tracing::debug!("No database attached, skipping re-sync");
        Ok(())
    }
}
