//! Pull, push and reset workflows over [`RepositoryState`]
//!
//! Every workflow that changes content on disk finishes with one call to the
//! [`DatabaseSync`] collaborator before reporting success.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use promptlib_git::StatusEntry;

use crate::changes::{ChangeRecord, ResetPlan, ResetType, changes_summary};
use crate::db::DatabaseSync;
use crate::state::RepositoryState;
use crate::{Error, Result};

fn iso(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Message used when the user accepts the default on push.
pub fn default_commit_message(now: DateTime<Utc>) -> String {
    format!("Update prompts and fragments [{}] via CLI", iso(now))
}

/// Message used by [`SyncService::offer_remote_sync`].
pub fn sync_commit_message(now: DateTime<Utc>) -> String {
    format!("Sync changes via CLI [{}]", iso(now))
}

/// What a pull attempt found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// Nothing incoming, or git is disabled
    UpToDate,
    /// Incoming changes need confirmation before [`SyncService::pull_confirmed`]
    ConfirmationRequired { diff: String },
    Pulled,
}

/// Pending changes prepared for confirmation before a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPlan {
    pub changes_summary: String,
    pub branch: String,
    pub changes: Vec<StatusEntry>,
}

/// Counts from a reset batch. Partial failure is still a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncResetResult {
    pub success_count: usize,
    pub fail_count: usize,
}

/// Orchestrates the sync workflows.
pub struct SyncService {
    state: RepositoryState,
    db: Arc<dyn DatabaseSync>,
}

impl SyncService {
    pub fn new(state: RepositoryState, db: Arc<dyn DatabaseSync>) -> Self {
        Self { state, db }
    }

    pub fn state(&self) -> &RepositoryState {
        &self.state
    }

    /// Mutable access for setup, which rebinds the adapter.
    pub fn state_mut(&mut self) -> &mut RepositoryState {
        &mut self.state
    }

    fn require_setup(&self) -> Result<()> {
        if self.state.is_setup()? {
            Ok(())
        } else {
            Err(Error::NotSetUp)
        }
    }

    pub async fn perform_db_sync(&self) -> Result<()> {
        tracing::debug!("Re-syncing database with library files");
        self.db.sync_prompts_with_file_system().await
    }

    /// `explicit`, else the configured remote.
    pub fn repo_url(&self, explicit: Option<&str>) -> Result<String> {
        let settings = self.state.settings()?;
        explicit
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .or(settings.remote())
            .map(String::from)
            .ok_or(Error::NoRemoteConfigured)
    }

    pub fn set_repo_url(&self, url: &str) -> Result<()> {
        self.state.config().set_remote_repository(url)
    }

    /// Check the remote for incoming changes and pull them when `force` is
    /// set. Without `force`, a non-empty diff is returned for confirmation.
    pub async fn pull_with_remote(&self, url: Option<&str>, force: bool) -> Result<PullOutcome> {
        self.require_setup()?;
        let settings = self.state.settings()?;
        if !settings.use_git {
            tracing::info!("Git disabled, nothing to pull");
            return Ok(PullOutcome::UpToDate);
        }
        let url = self.repo_url(url)?;

        let pending = self.state.count_pending_changes().await?;
        if pending > 0 {
            return Err(Error::LocalChangesBlockPull { count: pending });
        }

        self.state.fetch_from_remote(Some(&url)).await?;
        let diff = self.state.incoming_diff(settings.branch()).await?;
        if diff.trim().is_empty() {
            tracing::info!(url = %url, "Library is up to date");
            return Ok(PullOutcome::UpToDate);
        }
        if !force {
            return Ok(PullOutcome::ConfirmationRequired { diff });
        }
        self.pull_confirmed().await
    }

    /// Pull the default branch after the user confirmed the incoming diff.
    pub async fn pull_confirmed(&self) -> Result<PullOutcome> {
        self.require_setup()?;
        let settings = self.state.settings()?;
        self.state.pull_changes(settings.branch()).await?;
        self.perform_db_sync().await?;
        Ok(PullOutcome::Pulled)
    }

    /// Summarize pending changes and pick the target branch.
    pub async fn prepare_push(&self, branch: Option<&str>) -> Result<PushPlan> {
        self.require_setup()?;
        let changes = self.state.list_changes().await?;
        if changes.is_empty() {
            return Err(Error::NothingToPush);
        }

        let settings = self.state.settings()?;
        let branch = branch
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(settings.branch())
            .to_string();

        Ok(PushPlan {
            changes_summary: changes_summary(&changes),
            branch,
            changes,
        })
    }

    pub async fn commit_and_push(&self, branch: &str, message: &str) -> Result<()> {
        let pushed = self.state.push_to_remote(Some(branch), Some(message)).await?;
        tracing::info!(branch = %pushed, "Changes pushed");
        self.perform_db_sync().await
    }

    pub async fn prepare_reset(&self) -> Result<ResetPlan> {
        self.require_setup()?;
        let changes = self.state.list_changes().await?;
        if changes.is_empty() {
            return Err(Error::NothingToReset);
        }
        Ok(ResetPlan::from_entries(&changes))
    }

    /// Undo each record in order. A failing record is logged and counted;
    /// the rest are still attempted.
    pub async fn reset_changes(&self, records: &[ChangeRecord]) -> Result<SyncResetResult> {
        self.require_setup()?;
        let mut result = SyncResetResult::default();

        for record in records {
            match self.reset_one(record).await {
                Ok(()) => {
                    tracing::info!(path = %record.repo_path(), "Reset");
                    result.success_count += 1;
                }
                Err(e) => {
                    tracing::error!(path = %record.repo_path(), error = %e, "Failed to reset");
                    result.fail_count += 1;
                }
            }
        }

        if let Err(e) = self.perform_db_sync().await {
            tracing::error!(
                success = result.success_count,
                failed = result.fail_count,
                error = %e,
                "Database re-sync after reset failed"
            );
            return Err(Error::ResetResyncFailed {
                success_count: result.success_count,
                fail_count: result.fail_count,
                message: e.to_string(),
            });
        }
        Ok(result)
    }

    async fn reset_one(&self, record: &ChangeRecord) -> Result<()> {
        if !record.is_contained() {
            return Err(Error::OutsideContentRoots {
                path: record.path.clone(),
            });
        }
        let path = record.repo_path();
        match record.reset_type {
            ResetType::Delete => {
                if !self.state.discard_added_path(&path)? {
                    tracing::debug!(path = %path, "Already removed");
                }
                if let Err(e) = self.state.unstage_path(&path).await {
                    tracing::debug!(path = %path, error = %e, "Unstage after removal failed");
                }
                Ok(())
            }
            ResetType::Restore => self.state.restore_path(&path).await,
        }
    }

    /// Offer to push pending changes. Returns `Ok(false)` without side
    /// effects when there is nothing to offer or `confirm` declines.
    pub async fn offer_remote_sync<F>(&self, confirm: F) -> Result<bool>
    where
        F: FnOnce(&PushPlan) -> bool,
    {
        if !self.state.is_setup()? {
            return Ok(false);
        }
        let info = self.state.repository_info().await?;
        if info.url.is_none() {
            tracing::debug!("No origin, skipping sync offer");
            return Ok(false);
        }
        if self.state.settings()?.remote().is_none() {
            tracing::debug!("No remote repository configured, skipping sync offer");
            return Ok(false);
        }
        let changes = self.state.list_changes().await?;
        if changes.is_empty() {
            return Ok(false);
        }

        let branch = match info.branch {
            Some(branch) => branch,
            None => self.state.settings()?.branch().to_string(),
        };
        let plan = PushPlan {
            changes_summary: changes_summary(&changes),
            branch,
            changes,
        };
        if !confirm(&plan) {
            return Ok(false);
        }

        self.commit_and_push(&plan.branch, &sync_commit_message(Utc::now()))
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn commit_messages_carry_iso_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            default_commit_message(now),
            "Update prompts and fragments [2024-03-09T14:05:07.000Z] via CLI"
        );
        assert_eq!(
            sync_commit_message(now),
            "Sync changes via CLI [2024-03-09T14:05:07.000Z]"
        );
    }
}
