//! Shared builders for promptlib-core integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use promptlib_core::{
    DatabaseSync, Error, RepositoryState, Result, StaticConfig, SyncService,
};
use promptlib_fs::LibraryLayout;
use promptlib_git::GitBackend;
use promptlib_test_utils::git::fake_git_dir;
use promptlib_test_utils::{MockBackend, MockVcs, TestLibrary};

pub const REMOTE_URL: &str = "https://example.com/prompts.git";

/// Counts re-sync calls; optionally fails them.
#[derive(Debug, Default)]
pub struct RecordingDatabaseSync {
    calls: AtomicUsize,
    fail: bool,
}

impl RecordingDatabaseSync {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseSync for RecordingDatabaseSync {
    async fn sync_prompts_with_file_system(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::DatabaseSync {
                message: "scripted failure".into(),
            });
        }
        Ok(())
    }
}

/// A library whose git side is a [`MockVcs`].
pub struct MockHarness {
    pub lib: TestLibrary,
    pub vcs: MockVcs,
    pub db: Arc<RecordingDatabaseSync>,
    pub sync: SyncService,
}

impl MockHarness {
    pub fn state(&self) -> &RepositoryState {
        self.sync.state()
    }
}

fn mock_state(lib: &TestLibrary, vcs: &MockVcs, config: StaticConfig) -> RepositoryState {
    RepositoryState::new(
        LibraryLayout::new(lib.base()),
        Arc::new(config),
        Arc::new(MockBackend::new(vcs.clone())),
    )
}

/// Content dirs and a `.git` marker on disk, git calls answered by `vcs`.
pub fn mock_setup(vcs: impl FnOnce(MockVcs) -> MockVcs, config: StaticConfig) -> MockHarness {
    let lib = TestLibrary::new();
    lib.create_content_dirs();
    fake_git_dir(&lib.base());
    let vcs = vcs(MockVcs::new(lib.base()));
    harness(lib, vcs, config)
}

/// Nothing on disk at all.
pub fn mock_not_set_up(vcs: impl FnOnce(MockVcs) -> MockVcs, config: StaticConfig) -> MockHarness {
    let lib = TestLibrary::new();
    let vcs = vcs(MockVcs::new(lib.base()));
    harness(lib, vcs, config)
}

fn harness(lib: TestLibrary, vcs: MockVcs, config: StaticConfig) -> MockHarness {
    let db = Arc::new(RecordingDatabaseSync::default());
    let state = mock_state(&lib, &vcs, config);
    let sync = SyncService::new(state, db.clone());
    MockHarness { lib, vcs, db, sync }
}

/// A library backed by real git, pushed to a bare `origin`.
pub struct GitHarness {
    pub lib: TestLibrary,
    pub db: Arc<RecordingDatabaseSync>,
    pub sync: SyncService,
}

impl GitHarness {
    pub fn state(&self) -> &RepositoryState {
        self.sync.state()
    }
}

pub fn git_service(lib: &TestLibrary, config: StaticConfig) -> (Arc<RecordingDatabaseSync>, SyncService) {
    let db = Arc::new(RecordingDatabaseSync::default());
    let state = RepositoryState::new(
        LibraryLayout::new(lib.base()),
        Arc::new(config),
        Arc::new(GitBackend),
    );
    (db.clone(), SyncService::new(state, db))
}

pub fn git_setup() -> GitHarness {
    let lib = TestLibrary::with_remote();
    let (db, sync) = git_service(&lib, StaticConfig::with_remote(&lib.remote_url()));
    GitHarness { lib, db, sync }
}
