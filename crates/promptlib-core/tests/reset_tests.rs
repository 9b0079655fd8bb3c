//! Reset and push workflows against real repositories

mod common;

use common::git_setup;
use pretty_assertions::assert_eq;
use promptlib_core::{ContentKind, Error, OriginalType, ResetType, SyncResetResult};
use promptlib_test_utils::git::{git, head_commit};
use promptlib_test_utils::library::SEED_FILES;

fn seed(path: &str) -> &'static str {
    SEED_FILES
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, content)| *content)
        .unwrap()
}

#[tokio::test]
async fn modified_prompt_and_untracked_fragment_are_reset() {
    let h = git_setup();
    h.lib.write("prompts/foo/bar.md", "local edit\n");
    h.lib.write("fragments/common/x.md", "scratch\n");

    let plan = h.sync.prepare_reset().await.unwrap();

    assert_eq!(plan.prompt_changes.len(), 1);
    let prompt = &plan.prompt_changes[0];
    assert_eq!(prompt.kind, ContentKind::Prompt);
    assert_eq!(prompt.path, "foo/bar.md");
    assert_eq!(prompt.reset_type, ResetType::Restore);
    assert_eq!(prompt.original_type, OriginalType::Modified);

    assert_eq!(plan.fragment_changes.len(), 1);
    let fragment = &plan.fragment_changes[0];
    assert_eq!(fragment.path, "common/x.md");
    assert_eq!(fragment.reset_type, ResetType::Delete);
    assert_eq!(fragment.original_type, OriginalType::Added);

    let result = h.sync.reset_changes(&plan.all()).await.unwrap();

    assert_eq!(result, SyncResetResult { success_count: 2, fail_count: 0 });
    assert_eq!(h.lib.read("prompts/foo/bar.md"), seed("prompts/foo/bar.md"));
    h.lib.assert_file_missing("fragments/common/x.md");
    h.lib.assert_file_exists("fragments/common/tone.md");
    assert_eq!(h.lib.porcelain(), "");
    assert_eq!(h.db.calls(), 1);
}

#[tokio::test]
async fn moved_fragment_is_reset_on_both_sides() {
    let h = git_setup();
    h.lib.remove("fragments/common/tone.md");
    h.lib.write("fragments/common/voice.md", seed("fragments/common/tone.md"));

    // stages the move
    h.state().get_diff().await.unwrap();
    assert_eq!(h.state().count_pending_changes().await.unwrap(), 2);

    let plan = h.sync.prepare_reset().await.unwrap();
    let mut paths: Vec<(String, ResetType)> = plan
        .fragment_changes
        .iter()
        .map(|r| (r.path.clone(), r.reset_type))
        .collect();
    paths.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        paths,
        vec![
            ("common/tone.md".to_string(), ResetType::Restore),
            ("common/voice.md".to_string(), ResetType::Delete),
        ]
    );

    let result = h.sync.reset_changes(&plan.all()).await.unwrap();

    assert_eq!(result, SyncResetResult { success_count: 2, fail_count: 0 });
    assert_eq!(h.lib.read("fragments/common/tone.md"), seed("fragments/common/tone.md"));
    h.lib.assert_file_missing("fragments/common/voice.md");
    assert_eq!(h.lib.porcelain(), "");
}

#[tokio::test]
async fn reset_never_leaves_the_content_roots() {
    let h = git_setup();
    h.lib.write("outside.txt", "library root file\n");
    let record = promptlib_core::ChangeRecord::new(
        ContentKind::Prompt,
        "../outside.txt",
        OriginalType::Added,
    );

    let result = h.sync.reset_changes(&[record]).await.unwrap();

    assert_eq!(result, SyncResetResult { success_count: 0, fail_count: 1 });
    assert_eq!(h.lib.read("outside.txt"), "library root file\n");
}

#[tokio::test]
async fn staged_addition_in_new_directory_is_removed_cleanly() {
    let h = git_setup();
    h.lib.write("fragments/drafts/idea.md", "maybe\n");
    h.lib.git(&["add", "fragments/drafts/idea.md"]);

    let plan = h.sync.prepare_reset().await.unwrap();
    assert_eq!(plan.fragment_changes[0].reset_type, ResetType::Delete);

    let result = h.sync.reset_changes(&plan.all()).await.unwrap();

    assert_eq!(result.fail_count, 0);
    assert!(!h.lib.base().join("fragments/drafts").exists());
    h.lib.assert_file_exists("fragments/common/tone.md");
    assert_eq!(h.lib.porcelain(), "");
}

#[tokio::test]
async fn deleted_prompt_is_restored() {
    let h = git_setup();
    h.lib.remove("prompts/greeting/prompt.md");

    let plan = h.sync.prepare_reset().await.unwrap();
    assert_eq!(plan.prompt_changes[0].original_type, OriginalType::Deleted);

    h.sync.reset_changes(&plan.all()).await.unwrap();

    assert_eq!(
        h.lib.read("prompts/greeting/prompt.md"),
        seed("prompts/greeting/prompt.md")
    );
}

#[tokio::test]
async fn second_reset_finds_nothing_and_replay_still_succeeds() {
    let h = git_setup();
    h.lib.write("fragments/common/x.md", "scratch\n");
    h.lib.write("prompts/foo/bar.md", "local edit\n");
    let records = h.sync.prepare_reset().await.unwrap().all();

    h.sync.reset_changes(&records).await.unwrap();

    assert!(matches!(h.sync.prepare_reset().await, Err(Error::NothingToReset)));
    let replay = h.sync.reset_changes(&records).await.unwrap();
    assert_eq!(replay, SyncResetResult { success_count: 2, fail_count: 0 });
}

#[tokio::test]
async fn partial_selection_leaves_other_changes() {
    let h = git_setup();
    h.lib.write("prompts/foo/bar.md", "keep me\n");
    h.lib.write("fragments/common/x.md", "drop me\n");

    let plan = h.sync.prepare_reset().await.unwrap();
    h.sync.reset_changes(&plan.fragment_changes).await.unwrap();

    assert_eq!(h.lib.read("prompts/foo/bar.md"), "keep me\n");
    h.lib.assert_file_missing("fragments/common/x.md");
    assert!(h.sync.state().has_changes().await.unwrap());
}

#[tokio::test]
async fn push_commits_content_and_updates_remote() {
    let h = git_setup();
    h.lib.write("prompts/foo/bar.md", "pushed edit\n");
    h.lib.write("notes.txt", "not content\n");

    let plan = h.sync.prepare_push(None).await.unwrap();
    assert_eq!(plan.branch, "main");
    h.sync.commit_and_push(&plan.branch, "Edit bar").await.unwrap();

    let remote = h.lib.remote_path();
    assert_eq!(git(&remote, &["log", "-1", "--format=%s", "main"]), "Edit bar");
    assert_eq!(git(&remote, &["rev-parse", "main"]), head_commit(&h.lib.base()));
    assert!(!h.sync.state().has_changes().await.unwrap());
    assert!(h.lib.porcelain().contains("notes.txt"));
    assert_eq!(h.db.calls(), 1);
}

#[tokio::test]
async fn push_to_new_branch_sets_upstream() {
    let h = git_setup();
    h.lib.write("fragments/common/tone.md", "Be warm.\n");

    h.sync.commit_and_push("review", "Tone change").await.unwrap();

    assert_eq!(h.lib.git(&["rev-parse", "--abbrev-ref", "HEAD"]), "review");
    assert_eq!(
        h.lib.git(&["rev-parse", "--abbrev-ref", "review@{upstream}"]),
        "origin/review"
    );
    assert_eq!(
        git(&h.lib.remote_path(), &["log", "-1", "--format=%s", "review"]),
        "Tone change"
    );
}
