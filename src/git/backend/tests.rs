// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{GitMutation, GitQuery, GixBackend, ShellBackend};
use crate::git::tests::{init_test_repo_with_commit, run_git, temp_dir};

#[test]
fn test_gix_current_branch() {
    let temp = temp_dir();
    init_test_repo_with_commit(temp.path());
    run_git(&["switch", "-q", "-c", "feature"], temp.path());

    let branch = GixBackend::current_branch(temp.path()).unwrap();
    assert_eq!(branch.as_deref(), Some("feature"));
}

#[test]
fn test_gix_detached_head() {
    let temp = temp_dir();
    init_test_repo_with_commit(temp.path());
    let head = run_git(&["rev-parse", "HEAD"], temp.path());
    run_git(&["switch", "-q", "--detach", &head], temp.path());

    assert_eq!(GixBackend::current_branch(temp.path()).unwrap(), None);
    assert_eq!(GixBackend::head_commit(temp.path()).unwrap(), head);
}

#[test]
fn test_gix_resolution() {
    let temp = temp_dir();
    let base = init_test_repo_with_commit(temp.path());
    let head = run_git(&["rev-parse", "HEAD"], temp.path());

    assert!(GixBackend::resolves(temp.path(), &base).unwrap());
    assert!(GixBackend::resolves(temp.path(), "HEAD").unwrap());
    assert!(!GixBackend::resolves(temp.path(), "does-not-exist").unwrap());

    assert_eq!(
        GixBackend::object_id(temp.path(), &base).unwrap().as_deref(),
        Some(head.as_str())
    );
    assert_eq!(GixBackend::object_id(temp.path(), "does-not-exist").unwrap(), None);
}

#[test]
fn test_gix_local_branches() {
    let temp = temp_dir();
    let base = init_test_repo_with_commit(temp.path());

    assert!(GixBackend::local_branch_exists(temp.path(), &base).unwrap());
    assert!(!GixBackend::local_branch_exists(temp.path(), "nope").unwrap());
}

#[test]
fn test_queries_fail_outside_repository() {
    let temp = temp_dir();
    assert!(GixBackend::resolves(temp.path(), "HEAD").is_err());
    assert!(GixBackend::local_branch_exists(temp.path(), "main").is_err());
    assert!(ShellBackend::has_tracked_changes(temp.path()).is_err());
}

#[test]
fn test_shell_tracked_changes_ignore_untracked_files() {
    let temp = temp_dir();
    init_test_repo_with_commit(temp.path());
    assert!(!ShellBackend::has_tracked_changes(temp.path()).unwrap());

    std::fs::write(temp.path().join("notes.txt"), "scratch\n").unwrap();
    assert!(!ShellBackend::has_tracked_changes(temp.path()).unwrap());

    std::fs::write(temp.path().join("README.md"), "# Changed\n").unwrap();
    assert!(ShellBackend::has_tracked_changes(temp.path()).unwrap());
}

#[test]
fn test_shell_create_branch_rejects_existing() {
    let temp = temp_dir();
    let base = init_test_repo_with_commit(temp.path());

    ShellBackend::create_branch(temp.path(), "split", &base).unwrap();
    assert_eq!(
        GixBackend::current_branch(temp.path()).unwrap().as_deref(),
        Some("split")
    );
    ShellBackend::switch(temp.path(), &base).unwrap();
    assert!(ShellBackend::create_branch(temp.path(), "split", &base).is_err());
}

#[test]
fn test_shell_commit_fails_with_nothing_staged() {
    let temp = temp_dir();
    init_test_repo_with_commit(temp.path());
    assert!(ShellBackend::commit(temp.path(), "empty", true).is_err());
}

#[test]
fn test_shell_apply_rejects_malformed_patch() {
    let temp = temp_dir();
    init_test_repo_with_commit(temp.path());
    let patch = temp.path().join("bad.patch");
    std::fs::write(&patch, "this is not a patch\n").unwrap();

    let err = ShellBackend::apply(temp.path(), &patch, false).unwrap_err();
    assert!(err.to_string().starts_with("git command failed: git apply --index"));
}

#[test]
fn test_shell_apply_index_only_ignores_work_tree() {
    let temp = temp_dir();
    init_test_repo_with_commit(temp.path());
    // Work tree already holds the change; only the index lags behind.
    std::fs::write(temp.path().join("README.md"), "# Test 2\n").unwrap();
    let patch = temp.path().join("readme.patch");
    std::fs::write(
        &patch,
        "diff --git a/README.md b/README.md\n\
--- a/README.md\n\
+++ b/README.md\n\
@@ -1 +1 @@\n\
-# Test\n\
+# Test 2\n",
    )
    .unwrap();

    assert!(ShellBackend::apply(temp.path(), &patch, false).is_err());
    ShellBackend::apply(temp.path(), &patch, true).unwrap();
    assert_eq!(
        run_git(&["diff", "--cached", "--name-only"], temp.path()),
        "README.md"
    );
    assert_eq!(run_git(&["diff", "--name-only"], temp.path()), "");
}

#[test]
fn test_shell_reset_index_keeps_work_tree() {
    let temp = temp_dir();
    init_test_repo_with_commit(temp.path());
    std::fs::write(temp.path().join("README.md"), "# Staged\n").unwrap();
    run_git(&["add", "README.md"], temp.path());

    ShellBackend::reset_index(temp.path()).unwrap();
    assert_eq!(run_git(&["diff", "--cached", "--name-only"], temp.path()), "");
    assert_eq!(
        std::fs::read_to_string(temp.path().join("README.md")).unwrap(),
        "# Staged\n"
    );
}
