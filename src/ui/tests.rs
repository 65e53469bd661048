// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{
    Answer, TextPrompt, optional_branch_validator, parse_confirmation, reference_validator,
};

#[test]
fn test_answer_value() {
    assert_eq!(Answer::Value(3).value(), Some(3));
    assert_eq!(Answer::<i32>::Cancelled.value(), None);
    assert!(Answer::<()>::Cancelled.is_cancelled());
}

#[test]
fn test_render_prompt() {
    let with_default = TextPrompt {
        message: "Branch or commit to diff against",
        placeholder: None,
        default: Some("main"),
        validate: &reference_validator,
    };
    let with_placeholder = TextPrompt {
        message: "New branch for the commits",
        placeholder: Some("feature/split"),
        default: None,
        validate: &optional_branch_validator,
    };
    insta::assert_snapshot!(with_default.render(), @"Branch or commit to diff against [main]: ");
    insta::assert_snapshot!(with_placeholder.render(), @"New branch for the commits (e.g. feature/split): ");
}

#[test]
fn test_resolve_applies_default_then_validates() {
    let prompt = TextPrompt {
        message: "from",
        placeholder: None,
        default: Some("main"),
        validate: &reference_validator,
    };
    assert_eq!(prompt.resolve("").unwrap(), "main");
    assert_eq!(prompt.resolve("  develop \n").unwrap(), "develop");
    insta::assert_snapshot!(
        prompt.resolve("bad name").unwrap_err(),
        @"'bad name' is not a valid branch name or commit hash"
    );
}

#[test]
fn test_required_prompt_rejects_empty() {
    let prompt = TextPrompt {
        message: "from",
        placeholder: None,
        default: None,
        validate: &reference_validator,
    };
    insta::assert_snapshot!(prompt.resolve("   ").unwrap_err(), @"please enter a branch name or commit hash");
}

#[test]
fn test_optional_branch_accepts_empty() {
    assert!(optional_branch_validator("").is_ok());
    assert!(optional_branch_validator("feature/split-1").is_ok());
    assert!(optional_branch_validator("no spaces").is_err());
}

#[test]
fn test_parse_confirmation() {
    assert_eq!(parse_confirmation("", true), Some(true));
    assert_eq!(parse_confirmation("", false), Some(false));
    assert_eq!(parse_confirmation(" Y ", false), Some(true));
    assert_eq!(parse_confirmation("yes", false), Some(true));
    assert_eq!(parse_confirmation("No", true), Some(false));
    assert_eq!(parse_confirmation("maybe", true), None);
}
