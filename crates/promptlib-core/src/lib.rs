//! Prompt library synchronization engine
//!
//! [`RepositoryState`] answers "is the library set up and what changed" and
//! wraps the git operations on the library working tree. [`SyncService`]
//! builds the user-facing workflows on top of it:
//!
//! - **pull**: refuse while local edits exist, fetch, show the incoming diff,
//!   merge after confirmation
//! - **push**: summarize, commit on the target branch, push with upstream
//! - **reset**: delete added files and restore modified or deleted ones,
//!   one record at a time
//!
//! Settings come through [`ConfigProvider`]; the metadata database is
//! refreshed through [`DatabaseSync`].

pub mod changes;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod sync;

pub use changes::{ChangeRecord, ContentKind, OriginalType, ResetPlan, ResetType};
pub use config::{ConfigProvider, FileConfigProvider, StaticConfig, SyncSettings};
pub use db::{DatabaseSync, NoopDatabaseSync};
pub use error::{Error, Result};
pub use state::{LocalSetup, NO_CHANGES_DIFF, RepositoryInfo, RepositoryState};
pub use sync::{PullOutcome, PushPlan, SyncResetResult, SyncService};
