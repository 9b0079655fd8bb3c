use promptlib_fs::{ContentRoot, LibraryLayout};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_fresh_directory_has_no_content_dirs() {
    let temp = TempDir::new().unwrap();
    let layout = LibraryLayout::new(temp.path());

    assert!(layout.base_exists());
    assert!(!layout.content_dirs_exist());
    assert!(!layout.has_git_dir());
}

#[test]
fn test_ensure_content_dirs_creates_both_roots() {
    let temp = TempDir::new().unwrap();
    let layout = LibraryLayout::new(temp.path().join("library"));

    layout.ensure_content_dirs().unwrap();

    assert!(layout.prompts_dir().is_dir());
    assert!(layout.fragments_dir().is_dir());
    assert!(layout.content_dirs_exist());
}

#[test]
fn test_git_dir_detection() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();

    let layout = LibraryLayout::new(temp.path());
    assert!(layout.has_git_dir());
}

#[test]
fn test_missing_base_has_no_git_dir() {
    let temp = TempDir::new().unwrap();
    let layout = LibraryLayout::new(temp.path().join("nowhere"));
    assert!(!layout.base_exists());
    assert!(!layout.has_git_dir());
}

#[rstest]
#[case(ContentRoot::Prompts, "prompts")]
#[case(ContentRoot::Fragments, "fragments")]
fn test_content_dir_names(#[case] root: ContentRoot, #[case] name: &str) {
    let layout = LibraryLayout::new("/lib");
    assert_eq!(layout.content_dir(root).as_str(), format!("/lib/{name}"));
}
