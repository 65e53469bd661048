// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end pipeline tests against real temporary repositories.
//!
//! The model is replaced by one that cuts the diff at every file header, so
//! the produced patches always concatenate back to the aggregate diff.

use std::fs;
use std::path::Path;
use std::process::Command;

use pr_splitter::config::types::WorkspaceConfig;
use pr_splitter::decompose::DecompositionEngine;
use pr_splitter::error::{GitError, SplitError, SplitResult};
use pr_splitter::git::Repository;
use pr_splitter::model::{GenerationRequest, ModelResult, SplitModel};
use pr_splitter::pipeline::{
    AbortReason, Pipeline, PipelineOptions, RunOutcome, SplitRequest, TargetChoice,
};
use pr_splitter::refname::ReferencePoint;
use pr_splitter::store::DiffStore;
use pr_splitter::ui::{Answer, Interaction, TextPrompt};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Helper to run git commands in a directory, returning trimmed stdout.
fn run_git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Base branch with a typo in README.md, and a `feature` branch that fixes
/// it and adds config.toml. Returns the base branch name.
fn init_feature_repo(dir: &Path) -> String {
    run_git(&["init", "-q"], dir);
    run_git(&["config", "user.email", "test@test.com"], dir);
    run_git(&["config", "user.name", "Test"], dir);
    run_git(&["config", "commit.gpgsign", "false"], dir);
    fs::write(dir.join("README.md"), "# Tset\n").unwrap();
    run_git(&["add", "."], dir);
    run_git(&["commit", "-q", "-m", "Initial commit"], dir);
    let base = run_git(&["branch", "--show-current"], dir);

    run_git(&["switch", "-q", "-c", "feature"], dir);
    fs::write(dir.join("README.md"), "# Test\n").unwrap();
    fs::write(dir.join("config.toml"), "key = 1\n").unwrap();
    run_git(&["add", "."], dir);
    run_git(&["commit", "-q", "-m", "wip"], dir);
    base
}

fn reference(name: &str) -> ReferencePoint {
    ReferencePoint::new(name).unwrap()
}

/// One commit per file section, named after the file.
struct PerFileModel;

impl SplitModel for PerFileModel {
    async fn generate(&self, request: &GenerationRequest) -> ModelResult<String> {
        let diff = &request.prompt;
        let mut starts: Vec<usize> = diff
            .match_indices("\ndiff --git ")
            .map(|(i, _)| i + 1)
            .collect();
        starts.insert(0, 0);
        starts.push(diff.len());

        let commits: Vec<_> = starts
            .windows(2)
            .map(|w| {
                let patch = &diff[w[0]..w[1]];
                let file = patch
                    .lines()
                    .next()
                    .and_then(|header| header.split_whitespace().nth(3))
                    .map_or("files", |b| b.trim_start_matches("b/"));
                serde_json::json!({ "message": format!("update {file}"), "patchContent": patch })
            })
            .collect();
        Ok(serde_json::json!({ "commits": commits }).to_string())
    }
}

/// Returns a fixed answer regardless of the diff.
struct FixedModel(String);

impl SplitModel for FixedModel {
    async fn generate(&self, _request: &GenerationRequest) -> ModelResult<String> {
        Ok(self.0.clone())
    }
}

/// Non-interactive front end: cancels any question it did not expect.
#[derive(Default)]
struct Headless {
    notes: Vec<String>,
}

impl Interaction for Headless {
    fn ask_text(&mut self, _prompt: &TextPrompt<'_>) -> SplitResult<Answer<String>> {
        Ok(Answer::Cancelled)
    }

    fn confirm(&mut self, _message: &str, _default: bool) -> SplitResult<Answer<bool>> {
        Ok(Answer::Cancelled)
    }

    fn start(&mut self, _message: &str) {}

    fn stop(&mut self, _message: &str) {}

    fn note(&mut self, title: &str, body: &str) {
        self.notes.push(format!("{title}\n{body}"));
    }
}

fn pipeline<M: SplitModel>(
    dir: &Path,
    model: M,
    verify: bool,
) -> Pipeline<Repository, M, Headless> {
    let repo = Repository::open(dir).unwrap();
    let store = DiffStore::new(repo.workdir(), &WorkspaceConfig::default());
    Pipeline::new(
        repo,
        store,
        DecompositionEngine::new(model, verify),
        Headless::default(),
        PipelineOptions::default(),
    )
}

fn request(from: &str, target: TargetChoice) -> SplitRequest {
    SplitRequest {
        from: Some(reference(from)),
        target,
        assume_yes: true,
    }
}

// =============================================================================
// Successful runs
// =============================================================================

#[tokio::test]
async fn test_split_creates_one_commit_per_unit() {
    let temp = temp_dir();
    let dir = temp.path();
    let base = init_feature_repo(dir);

    let mut pipeline = pipeline(dir, PerFileModel, true);
    let outcome = pipeline
        .run(request(&base, TargetChoice::Branch(reference("split"))))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Reconstructed {
            target: reference("split"),
            base: reference(&base),
            commits: 2,
        }
    );

    let log = run_git(&["log", "--format=%s", &format!("{base}..split")], dir);
    assert_eq!(log, "update config.toml\nupdate README.md");

    // Same tree as the branch that was split, and we are back on it.
    assert_eq!(run_git(&["diff", "feature", "split", "--stat"], dir), "");
    assert_eq!(run_git(&["branch", "--show-current"], dir), "feature");
}

#[tokio::test]
async fn test_split_writes_patch_files() {
    let temp = temp_dir();
    let dir = temp.path();
    let base = init_feature_repo(dir);

    let mut pipeline = pipeline(dir, PerFileModel, true);
    let outcome = pipeline.run(request(&base, TargetChoice::Skip)).await.unwrap();

    let RunOutcome::Materialized { patches } = outcome else {
        panic!("expected patch files only, got {outcome:?}");
    };
    let names: Vec<_> = patches
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["001-update-readme-md.patch", "002-update-config-toml.patch"]);

    let aggregate = fs::read_to_string(pipeline.store().aggregate_path()).unwrap();
    let joined: String = patches
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();
    assert_eq!(joined, aggregate);

    // Nothing was committed or switched.
    assert_eq!(run_git(&["branch", "--list", "split"], dir), "");
    assert_eq!(run_git(&["branch", "--show-current"], dir), "feature");
    assert_eq!(pipeline.ui().notes.len(), 1);
}

#[tokio::test]
async fn test_split_uncommitted_changes_on_current_branch() {
    let temp = temp_dir();
    let dir = temp.path();
    init_feature_repo(dir);
    fs::write(dir.join("README.md"), "# Tested\n").unwrap();
    fs::write(dir.join("config.toml"), "key = 2\n").unwrap();
    run_git(&["add", "README.md"], dir);

    let mut pipeline = pipeline(dir, PerFileModel, true);
    let outcome = pipeline
        .run(request("feature", TargetChoice::Branch(reference("split"))))
        .await
        .unwrap();

    assert!(
        matches!(outcome, RunOutcome::Reconstructed { commits: 2, .. }),
        "{outcome:?}"
    );
    let log = run_git(&["log", "--format=%s", "feature..split"], dir);
    assert_eq!(log, "update config.toml\nupdate README.md");
    assert_eq!(run_git(&["show", "split:README.md"], dir), "# Tested");
    assert_eq!(run_git(&["show", "split:config.toml"], dir), "key = 2");

    assert_eq!(run_git(&["branch", "--show-current"], dir), "feature");
    assert_eq!(
        run_git(&["status", "--porcelain", "--untracked-files=no"], dir),
        ""
    );
}

#[tokio::test]
async fn test_split_without_changes_aborts() {
    let temp = temp_dir();
    let dir = temp.path();
    init_feature_repo(dir);

    let mut pipeline = pipeline(dir, PerFileModel, true);
    let outcome = pipeline
        .run(request("feature", TargetChoice::Branch(reference("split"))))
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Aborted(AbortReason::EmptyDiff));
    assert_eq!(run_git(&["branch", "--list", "split"], dir), "");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_unknown_reference_fails_before_diff() {
    let temp = temp_dir();
    let dir = temp.path();
    init_feature_repo(dir);

    let mut pipeline = pipeline(dir, PerFileModel, true);
    let err = pipeline
        .run(request("no-such-branch", TargetChoice::Skip))
        .await
        .unwrap_err();

    assert!(matches!(err, SplitError::Git(_)), "{err:?}");
    assert!(!pipeline.store().aggregate_path().exists());
}

#[tokio::test]
async fn test_failed_patch_switches_back() {
    let temp = temp_dir();
    let dir = temp.path();
    let base = init_feature_repo(dir);

    let good = "diff --git a/config.toml b/config.toml\n\
new file mode 100644\n\
--- /dev/null\n\
+++ b/config.toml\n\
@@ -0,0 +1 @@\n\
+key = 1\n";
    let bad = "diff --git a/README.md b/README.md\n\
--- a/README.md\n\
+++ b/README.md\n\
@@ -1 +1 @@\n\
-# Nope\n\
+# Test\n";
    let answer = serde_json::json!({
        "commits": [
            { "message": "add config", "patchContent": good },
            { "message": "fix typo", "patchContent": bad },
        ]
    })
    .to_string();

    let mut pipeline = pipeline(dir, FixedModel(answer), false);
    let err = pipeline
        .run(request(&base, TargetChoice::Branch(reference("split"))))
        .await
        .unwrap_err();

    match err {
        SplitError::Reconstruction(inner) => {
            assert_eq!(inner.unit, 2);
            assert_eq!(inner.total, 2);
            assert_eq!(inner.committed, 1);
            assert!(inner.rollback.is_none());
        }
        other => panic!("expected reconstruction error, got {other:?}"),
    }

    assert_eq!(run_git(&["branch", "--show-current"], dir), "feature");
    let log = run_git(&["log", "--format=%s", &format!("{base}..split")], dir);
    assert_eq!(log, "add config");
}

#[tokio::test]
async fn test_uncommitted_changes_block_other_base() {
    let temp = temp_dir();
    let dir = temp.path();
    let base = init_feature_repo(dir);
    fs::write(dir.join("README.md"), "# Tested\n").unwrap();

    let mut pipeline = pipeline(dir, PerFileModel, true);
    let err = pipeline
        .run(request(&base, TargetChoice::Branch(reference("split"))))
        .await
        .unwrap_err();

    assert!(
        matches!(&err, SplitError::Git(e) if matches!(**e, GitError::DirtyWorkTree { .. })),
        "{err:?}"
    );
    assert_eq!(run_git(&["branch", "--list", "split"], dir), "");
    assert_eq!(run_git(&["branch", "--show-current"], dir), "feature");
    assert_eq!(fs::read_to_string(dir.join("README.md")).unwrap(), "# Tested\n");
}

#[tokio::test]
async fn test_existing_target_branch_is_left_alone() {
    let temp = temp_dir();
    let dir = temp.path();
    let base = init_feature_repo(dir);
    run_git(&["branch", "split", &base], dir);
    let before = run_git(&["rev-parse", "split"], dir);

    let mut pipeline = pipeline(dir, PerFileModel, true);
    let err = pipeline
        .run(request(&base, TargetChoice::Branch(reference("split"))))
        .await
        .unwrap_err();

    assert!(matches!(err, SplitError::Git(_)), "{err:?}");
    assert_eq!(run_git(&["rev-parse", "split"], dir), before);
    assert_eq!(run_git(&["branch", "--show-current"], dir), "feature");
}
