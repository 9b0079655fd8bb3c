use assert_fs::prelude::*;
use predicates::prelude::*;
use promptlib_fs::{LibraryLayout, NormalizedPath, io};

#[test]
fn test_copy_nested_content_tree() {
    let source = assert_fs::TempDir::new().unwrap();
    source.child("prompts/review/prompt.md").write_str("Review.\n").unwrap();
    source
        .child("prompts/review/examples/one.md")
        .write_str("Example.\n")
        .unwrap();
    source.child("prompts/empty").create_dir_all().unwrap();

    let library = assert_fs::TempDir::new().unwrap();
    let layout = LibraryLayout::new(library.path());
    layout.ensure_content_dirs().unwrap();

    let copied = io::copy_dir_all(
        &source.path().join("prompts"),
        &layout.prompts_dir().to_native(),
    )
    .unwrap();

    assert_eq!(copied, 2);
    library
        .child("prompts/review/prompt.md")
        .assert("Review.\n");
    library
        .child("prompts/review/examples/one.md")
        .assert(predicate::str::contains("Example."));
    library.child("prompts/empty").assert(predicate::path::is_dir());
}

#[test]
fn test_remove_path_removes_directory_tree() {
    let library = assert_fs::TempDir::new().unwrap();
    library.child("prompts/old/prompt.md").write_str("x").unwrap();
    library.child("prompts/old/notes/a.md").write_str("y").unwrap();

    let target = NormalizedPath::new(library.path().join("prompts/old"));
    assert!(io::remove_path(&target).unwrap());
    assert!(!io::remove_path(&target).unwrap());

    library.child("prompts/old").assert(predicate::path::missing());
    library.child("prompts").assert(predicate::path::is_dir());
}

#[test]
fn test_gitignore_lines_under_existing_entries() {
    let library = assert_fs::TempDir::new().unwrap();
    library.child(".gitignore").write_str("custom/\n*.log\n").unwrap();

    let path = NormalizedPath::new(library.path().join(".gitignore"));
    let added = io::ensure_lines(&path, "# header", &["*.log", ".DS_Store"]).unwrap();

    assert_eq!(added, 1);
    library
        .child(".gitignore")
        .assert(predicate::str::starts_with("custom/\n*.log\n"))
        .assert(predicate::str::ends_with("\n# header\n.DS_Store\n"));
}
