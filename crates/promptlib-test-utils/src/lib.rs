//! Shared test utilities for the promptlib workspace.
//!
//! This crate is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures (fake `.git`, real repos, bare remotes)
//! - [`library`]: [`TestLibrary`] builder for a prompt library on disk
//! - [`mock`]: [`MockVcs`] recording adapter with scripted failures

pub mod git;
pub mod library;
pub mod mock;

pub use library::TestLibrary;
pub use mock::{MockBackend, MockVcs};
