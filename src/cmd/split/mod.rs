// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Split command: wire the real collaborators into a [`Pipeline`] and run it.
//!
//! ```text
//! cwd --> Repository (git CLI + gix)
//!         DiffStore  (<workdir>/<workspace.root>)
//!         OllamaClient --> DecompositionEngine
//!         Terminal (rustyline + indicatif)
//!             |
//!          Pipeline::run(SplitRequest) --> RunOutcome --> summary
//! ```

use std::fmt::Write as _;

use anyhow::Context;
use tracing::{debug, info};

use crate::cli::split::SplitArgs;
use crate::config::Config;
use crate::decompose::DecompositionEngine;
use crate::error::Result;
use crate::git::{CommitOptions, Repository};
use crate::model::create_model;
use crate::pipeline::{AbortReason, Pipeline, PipelineOptions, RunOutcome};
use crate::store::DiffStore;
use crate::ui::Terminal;

/// Run the split command from the current directory.
///
/// `--model` and `--work-dir` are expected to be folded into `config`
/// already, see [`SplitArgs::to_config_overrides`].
///
/// # Errors
///
/// Returns an error if the repository, model or terminal cannot be set up,
/// or if the pipeline fails.
pub async fn run_split_command(args: &SplitArgs, config: &Config) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let repository = Repository::open(&cwd)
        .with_context(|| format!("no usable git repository at {}", cwd.display()))?;

    let store = DiffStore::new(repository.workdir(), &config.workspace);
    debug!(root = %store.root().display(), "diff store");

    let model = create_model(&config.model).context("failed to set up the model client")?;
    info!(
        provider = %config.model.provider,
        model = %config.model.name,
        endpoint = %model.endpoint(),
        "using model"
    );
    let engine = DecompositionEngine::new(model, config.model.verify_completeness);

    let terminal = Terminal::new().context("failed to open the terminal")?;
    let options = PipelineOptions {
        commit: CommitOptions {
            skip_hooks: config.git.skip_hooks,
        },
        clear_stale: config.workspace.clear_stale,
    };

    let mut pipeline = Pipeline::new(repository, store, engine, terminal, options);
    let outcome = pipeline.run(args.to_request()).await?;

    print!("{}", format_outcome(&outcome));
    Ok(())
}

/// Summary printed after a run.
#[must_use]
pub fn format_outcome(outcome: &RunOutcome) -> String {
    let mut out = String::new();
    match outcome {
        RunOutcome::Reconstructed {
            target,
            base,
            commits,
        } => {
            let _ = writeln!(
                out,
                "Created branch '{target}' from '{base}' with {commits} commit(s)"
            );
        }
        RunOutcome::Materialized { patches } => {
            let _ = writeln!(out, "Wrote {} patch file(s), no branch created:", patches.len());
            for patch in patches {
                let _ = writeln!(out, "  {}", patch.display());
            }
        }
        RunOutcome::Aborted(AbortReason::Cancelled) => {
            out.push_str("Cancelled, nothing was changed\n");
        }
        RunOutcome::Aborted(AbortReason::EmptyDiff) => {
            out.push_str("Nothing to split: no changes against the reference point\n");
        }
    }
    out
}

#[cfg(test)]
mod tests;
