// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Split command arguments.
//!
//! ```text
//! --from REF        skip the reference prompt
//! --target BRANCH   skip the target prompt     } mutually
//! --no-apply        only write patch files     } exclusive
//! --yes             skip the confirmation
//! --model NAME      model.name override
//! --work-dir DIR    workspace.root override
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::pipeline::{SplitRequest, TargetChoice};
use crate::refname::ReferencePoint;

/// Arguments for the `split` command.
#[derive(Debug, Clone, Default, Args)]
pub struct SplitArgs {
    /// Branch or commit to diff against and branch from.
    #[arg(short = 'f', long = "from", value_name = "REF")]
    pub from: Option<ReferencePoint>,

    /// Branch to create with the split commits.
    #[arg(short = 't', long = "target", value_name = "BRANCH", conflicts_with = "no_apply")]
    pub target: Option<ReferencePoint>,

    /// Only write the patch files; do not create a branch.
    #[arg(long = "no-apply")]
    pub no_apply: bool,

    /// Do not ask for confirmation before creating the branch.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Model to use, overrides model.name.
    #[arg(short = 'm', long = "model", value_name = "NAME")]
    pub model: Option<String>,

    /// Directory for the diff and patch files, overrides workspace.root.
    #[arg(short = 'w', long = "work-dir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
}

impl SplitArgs {
    /// Overrides implied by the flags, applied after the global ones.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = Vec::new();
        if let Some(ref model) = self.model {
            overrides.push(format!("model.name={model}"));
        }
        if let Some(ref dir) = self.work_dir {
            overrides.push(format!("workspace.root={}", dir.display()));
        }
        overrides
    }

    /// The pipeline request these flags describe.
    #[must_use]
    pub fn to_request(&self) -> SplitRequest {
        let target = match (&self.target, self.no_apply) {
            (_, true) => TargetChoice::Skip,
            (Some(branch), false) => TargetChoice::Branch(branch.clone()),
            (None, false) => TargetChoice::Prompt,
        };
        SplitRequest {
            from: self.from.clone(),
            target,
            assume_yes: self.yes,
        }
    }
}
