//! Two libraries sharing one bare remote
//!
//! Library A is the seeded [`TestLibrary`]; library B is created with
//! `setup_from_remote_url`. Edits travel A -> remote -> B and back again
//! through the real `git` binary.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use promptlib_core::{
    DatabaseSync, Error, PullOutcome, RepositoryState, Result, StaticConfig, SyncService,
};
use promptlib_fs::LibraryLayout;
use promptlib_git::GitBackend;
use promptlib_test_utils::TestLibrary;
use promptlib_test_utils::git::configure_identity;
use tempfile::TempDir;

#[derive(Default)]
struct CountingDatabaseSync(AtomicUsize);

impl CountingDatabaseSync {
    fn calls(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseSync for CountingDatabaseSync {
    async fn sync_prompts_with_file_system(&self) -> Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn service(base: &Path, remote: &str) -> (Arc<CountingDatabaseSync>, SyncService) {
    let db = Arc::new(CountingDatabaseSync::default());
    let state = RepositoryState::new(
        LibraryLayout::new(base),
        Arc::new(StaticConfig::with_remote(remote)),
        Arc::new(GitBackend),
    );
    (db.clone(), SyncService::new(state, db))
}

struct Pair {
    a: TestLibrary,
    a_sync: SyncService,
    a_db: Arc<CountingDatabaseSync>,
    _b_dir: TempDir,
    b_base: std::path::PathBuf,
    b_sync: SyncService,
    b_db: Arc<CountingDatabaseSync>,
}

async fn pair() -> Pair {
    let a = TestLibrary::with_remote();
    let (a_db, a_sync) = service(&a.base(), &a.remote_url());

    let b_dir = TempDir::new().unwrap();
    let b_base = b_dir.path().join("library");
    let (b_db, mut b_sync) = service(&b_base, &a.remote_url());
    b_sync
        .state_mut()
        .setup_from_remote_url(&a.remote_url())
        .await
        .unwrap();
    configure_identity(&b_base);

    Pair {
        a,
        a_sync,
        a_db,
        _b_dir: b_dir,
        b_base,
        b_sync,
        b_db,
    }
}

#[tokio::test]
async fn test_setup_from_remote_clones_seed_content() {
    let p = pair().await;

    assert!(p.b_sync.state().is_setup().unwrap());
    assert_eq!(
        std::fs::read_to_string(p.b_base.join("prompts/foo/bar.md")).unwrap(),
        "# Bar\n\nOriginal prompt body.\n"
    );
    let info = p.b_sync.state().repository_info().await.unwrap();
    assert_eq!(info.branch.as_deref(), Some("main"));
    assert_eq!(info.url.as_deref(), Some(p.a.remote_url().as_str()));
    assert!(!p.b_sync.state().has_changes().await.unwrap());
}

#[tokio::test]
async fn test_edit_travels_from_a_to_b() {
    let p = pair().await;
    p.a.write("prompts/foo/bar.md", "# Bar\n\nRevised in A.\n");

    let plan = p.a_sync.prepare_push(None).await.unwrap();
    assert_eq!(plan.branch, "main");
    p.a_sync
        .commit_and_push(&plan.branch, "Revise bar")
        .await
        .unwrap();
    assert_eq!(p.a_db.calls(), 1);

    let diff = match p.b_sync.pull_with_remote(None, false).await.unwrap() {
        PullOutcome::ConfirmationRequired { diff } => diff,
        other => panic!("expected confirmation, got {other:?}"),
    };
    assert!(diff.contains("+Revised in A."));
    assert_eq!(p.b_db.calls(), 0);

    assert_eq!(
        p.b_sync.pull_confirmed().await.unwrap(),
        PullOutcome::Pulled
    );
    assert_eq!(p.b_db.calls(), 1);
    assert_eq!(
        std::fs::read_to_string(p.b_base.join("prompts/foo/bar.md")).unwrap(),
        "# Bar\n\nRevised in A.\n"
    );
}

#[tokio::test]
async fn test_edit_travels_back_from_b_to_a() {
    let p = pair().await;
    let fragment = p.b_base.join("fragments/style/voice.md");
    std::fs::create_dir_all(fragment.parent().unwrap()).unwrap();
    std::fs::write(&fragment, "Warm and direct.\n").unwrap();

    let plan = p.b_sync.prepare_push(None).await.unwrap();
    assert_eq!(plan.changes.len(), 1);
    p.b_sync
        .commit_and_push(&plan.branch, "Add voice fragment")
        .await
        .unwrap();

    assert_eq!(
        p.a_sync.pull_with_remote(None, true).await.unwrap(),
        PullOutcome::Pulled
    );
    assert_eq!(p.a.read("fragments/style/voice.md"), "Warm and direct.\n");

    assert_eq!(
        p.a_sync.pull_with_remote(None, false).await.unwrap(),
        PullOutcome::UpToDate
    );
}

#[tokio::test]
async fn test_pending_edit_in_b_blocks_pull_until_reset() {
    let p = pair().await;
    p.a.write("prompts/greeting/prompt.md", "Say hi to {{name}}.\n");
    p.a_sync.commit_and_push("main", "Shorter greeting").await.unwrap();

    std::fs::write(p.b_base.join("prompts/foo/bar.md"), "Local scribble.\n").unwrap();
    let err = p.b_sync.pull_with_remote(None, true).await.unwrap_err();
    assert!(matches!(err, Error::LocalChangesBlockPull { count: 1 }));

    let plan = p.b_sync.prepare_reset().await.unwrap();
    let result = p.b_sync.reset_changes(&plan.all()).await.unwrap();
    assert_eq!(result.success_count, 1);
    assert_eq!(result.fail_count, 0);

    assert_eq!(
        p.b_sync.pull_with_remote(None, true).await.unwrap(),
        PullOutcome::Pulled
    );
    assert_eq!(
        std::fs::read_to_string(p.b_base.join("prompts/greeting/prompt.md")).unwrap(),
        "Say hi to {{name}}.\n"
    );
    assert_eq!(
        std::fs::read_to_string(p.b_base.join("prompts/foo/bar.md")).unwrap(),
        "# Bar\n\nOriginal prompt body.\n"
    );
}

#[tokio::test]
async fn test_local_setup_inherits_origin_from_source_repo() {
    let a = TestLibrary::with_remote();
    let target = TempDir::new().unwrap();
    let base = target.path().join("library");
    let (_db, mut sync) = service(&base, &a.remote_url());

    let setup = sync
        .state_mut()
        .setup_from_local_directory(&a.base())
        .await
        .unwrap();

    assert_eq!(setup.url.as_deref(), Some(a.remote_url().as_str()));
    assert_eq!(
        std::fs::read_to_string(base.join("fragments/common/tone.md")).unwrap(),
        "Be concise.\n"
    );
    let changes = sync.state().list_changes().await.unwrap();
    assert_eq!(changes.len(), 3);
}
