// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use super::format_outcome;
use crate::pipeline::{AbortReason, RunOutcome};
use crate::refname::ReferencePoint;

#[test]
fn test_format_reconstructed() {
    let outcome = RunOutcome::Reconstructed {
        target: ReferencePoint::new("feature/split").unwrap(),
        base: ReferencePoint::new("main").unwrap(),
        commits: 3,
    };
    insta::assert_snapshot!(
        format_outcome(&outcome),
        @"Created branch 'feature/split' from 'main' with 3 commit(s)"
    );
}

#[test]
fn test_format_materialized() {
    let outcome = RunOutcome::Materialized {
        patches: vec![
            PathBuf::from("pr-splitter/ai-commits/001-add-config.patch"),
            PathBuf::from("pr-splitter/ai-commits/002-fix-typo.patch"),
        ],
    };
    insta::assert_snapshot!(format_outcome(&outcome), @r"
    Wrote 2 patch file(s), no branch created:
      pr-splitter/ai-commits/001-add-config.patch
      pr-splitter/ai-commits/002-fix-typo.patch
    ");
}

#[test]
fn test_format_aborted() {
    assert_eq!(
        format_outcome(&RunOutcome::Aborted(AbortReason::Cancelled)),
        "Cancelled, nothing was changed\n"
    );
    assert!(format_outcome(&RunOutcome::Aborted(AbortReason::EmptyDiff)).starts_with("Nothing to split"));
}
