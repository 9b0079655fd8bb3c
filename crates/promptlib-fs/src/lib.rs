//! Content store for the prompt library
//!
//! Provides the on-disk conventions of a library (`prompts/<id>/...` and
//! `fragments/<category>/<name>.md` under one base directory) together with
//! the filesystem operations the sync engine needs: existence checks,
//! recursive copy and removal, directory creation and atomic writes.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use config::ConfigStore;
pub use constants::{ContentRoot, LibraryPath};
pub use error::{Error, Result};
pub use layout::LibraryLayout;
pub use path::NormalizedPath;
