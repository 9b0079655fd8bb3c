//! Git adapter for the prompt library
//!
//! [`VcsAdapter`] is the narrow interface the sync engine uses against one
//! working tree; [`VcsBackend`] creates adapters and performs the operations
//! that happen before a working tree exists (init, clone). [`GitCli`] and
//! [`GitBackend`] implement both by driving the `git` executable.
//!
//! Nothing here retries or times out: a failed network call surfaces as
//! [`Error::CommandFailed`] and the caller decides what to do.

pub mod adapter;
pub mod cli;
pub mod diff;
pub mod error;
pub mod remote;
pub mod status;

pub use adapter::{CommitOutcome, PushOptions, VcsAdapter, VcsBackend};
pub use cli::{GitBackend, GitCli};
pub use diff::DiffArgs;
pub use error::{Error, Result};
pub use remote::RemoteInfo;
pub use status::{ChangeStatus, StatusEntry};

/// The only remote name the library works with.
pub const ORIGIN: &str = "origin";
