// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reconstruction pipeline.
//!
//! ```text
//! Idle --compute_diff--> DiffAcquired --decompose--> Decomposed
//!   |                        |  (empty diff)              |
//!   |                        v                            v
//!   |                     Aborted <--write fails--- Materialized --no target--> done
//!   |                        ^                            |
//!   |                        |                  switch_to(from), create_branch
//!   |                        |                            v
//!   |                        +---apply/commit fails--- Reconstructing
//!   |                             switch_to(original)     |
//!   |                                                     v
//!   +------------------------------------------------ Reconstructed
//! ```
//!
//! Stages run strictly one after another: the working tree is shared state
//! and the gateway is held by `&mut`. Nothing touches branches before every
//! patch is on disk, and a failure while replaying always attempts to switch
//! back to the branch the run started on. Commits already created on the
//! target branch are left there for inspection.


use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::decompose::{CommitUnit, DecompositionEngine};
use crate::error::{GitError, ReconstructionError, SplitResult};
use crate::git::{ApplyMode, CommitOptions, VcsGateway};
use crate::model::SplitModel;
use crate::refname::ReferencePoint;
use crate::store::DiffStore;
use crate::ui::{Answer, Interaction, TextPrompt, optional_branch_validator, reference_validator};

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    DiffAcquired,
    Decomposed,
    Materialized,
    Reconstructing,
    Reconstructed,
    Aborted,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::DiffAcquired => "diff-acquired",
            Self::Decomposed => "decomposed",
            Self::Materialized => "materialized",
            Self::Reconstructing => "reconstructing",
            Self::Reconstructed => "reconstructed",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// How the target branch is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TargetChoice {
    /// Ask; an empty answer keeps only the patch files.
    #[default]
    Prompt,
    /// Use this branch without asking.
    Branch(ReferencePoint),
    /// Stop after writing the patch files.
    Skip,
}

/// Inputs of one run. Missing values are asked for.
#[derive(Debug, Clone, Default)]
pub struct SplitRequest {
    /// Reference point to diff against and branch from.
    pub from: Option<ReferencePoint>,
    pub target: TargetChoice,
    /// Skip the confirmation before branches are touched.
    pub assume_yes: bool,
}

/// Why a run stopped early without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The user cancelled a prompt.
    Cancelled,
    /// Nothing differs from the reference point.
    EmptyDiff,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled"),
            Self::EmptyDiff => f.write_str("no changes to split"),
        }
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every unit was committed on `target`, built from `base`.
    Reconstructed {
        target: ReferencePoint,
        base: ReferencePoint,
        commits: usize,
    },
    /// Patch files were written; no branch was touched.
    Materialized { patches: Vec<PathBuf> },
    /// Stopped before doing anything irreversible.
    Aborted(AbortReason),
}

/// Branch bookkeeping while units are replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTransaction {
    pub original: ReferencePoint,
    pub target: ReferencePoint,
    pub applied: usize,
}

/// Knobs that do not come from the user at run time.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub commit: CommitOptions,
    /// Remove patches from an earlier run before writing new ones.
    pub clear_stale: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            commit: CommitOptions::default(),
            clear_stale: true,
        }
    }
}

/// Drives one split from diff to branch.
pub struct Pipeline<G, M, U> {
    gateway: G,
    store: DiffStore,
    engine: DecompositionEngine<M>,
    ui: U,
    options: PipelineOptions,
    state: PipelineState,
}

impl<G, M, U> Pipeline<G, M, U>
where
    G: VcsGateway,
    M: SplitModel,
    U: Interaction,
{
    pub fn new(
        gateway: G,
        store: DiffStore,
        engine: DecompositionEngine<M>,
        ui: U,
        options: PipelineOptions,
    ) -> Self {
        Self {
            gateway,
            store,
            engine,
            ui,
            options,
            state: PipelineState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    #[must_use]
    pub const fn ui(&self) -> &U {
        &self.ui
    }

    #[must_use]
    pub const fn store(&self) -> &DiffStore {
        &self.store
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = %self.state, to = %next, "pipeline state");
        self.state = next;
    }

    /// Run the whole pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first failure. Failures before reconstruction leave the
    /// repository untouched; a failure during reconstruction is reported as
    /// `SplitError::Reconstruction` after switching back.
    pub async fn run(&mut self, request: SplitRequest) -> SplitResult<RunOutcome> {
        self.transition(PipelineState::Idle);
        let result = self.execute(request).await;
        match &result {
            Ok(RunOutcome::Aborted(reason)) => {
                info!(%reason, "run aborted");
                self.transition(PipelineState::Aborted);
            }
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "run failed");
                self.transition(PipelineState::Aborted);
            }
        }
        result
    }

    async fn execute(&mut self, request: SplitRequest) -> SplitResult<RunOutcome> {
        let Some(from) = self.reference_point(request.from)? else {
            return Ok(RunOutcome::Aborted(AbortReason::Cancelled));
        };
        self.gateway.resolve(&from)?;

        let Some(diff) = self.acquire_diff(&from)? else {
            return Ok(RunOutcome::Aborted(AbortReason::EmptyDiff));
        };

        self.ui.start("Splitting the diff into commits");
        let units = match self.engine.decompose(&diff).await {
            Ok(units) => units,
            Err(e) => {
                self.ui.stop("Decomposition failed");
                return Err(e);
            }
        };
        self.transition(PipelineState::Decomposed);
        self.ui.stop(&format!("Model proposed {} commit(s)", units.len()));

        let patches = self.materialize(&units)?;

        let target = match request.target {
            TargetChoice::Skip => None,
            TargetChoice::Branch(branch) => Some(branch),
            TargetChoice::Prompt => match self.ask_target()? {
                Answer::Value(target) => target,
                Answer::Cancelled => return Ok(RunOutcome::Aborted(AbortReason::Cancelled)),
            },
        };
        let Some(target) = target else {
            info!(patches = patches.len(), "no target branch, keeping patch files only");
            return Ok(RunOutcome::Materialized { patches });
        };

        if !request.assume_yes {
            let question = format!(
                "Create branch '{target}' from '{from}' with {} commit(s)?",
                units.len()
            );
            match self.ui.confirm(&question, true)? {
                Answer::Value(true) => {}
                Answer::Value(false) => return Ok(RunOutcome::Materialized { patches }),
                Answer::Cancelled => return Ok(RunOutcome::Aborted(AbortReason::Cancelled)),
            }
        }

        let commits = self.reconstruct(&from, &target, &units, &patches)?;
        Ok(RunOutcome::Reconstructed {
            target,
            base: from,
            commits,
        })
    }

    fn reference_point(
        &mut self,
        given: Option<ReferencePoint>,
    ) -> SplitResult<Option<ReferencePoint>> {
        if let Some(from) = given {
            return Ok(Some(from));
        }
        let current = self.gateway.current_ref()?;
        let prompt = TextPrompt {
            message: "Branch or commit to diff against",
            placeholder: None,
            default: Some(current.as_str()),
            validate: &reference_validator,
        };
        match self.ui.ask_text(&prompt)? {
            Answer::Value(value) => Ok(Some(ReferencePoint::new(value)?)),
            Answer::Cancelled => Ok(None),
        }
    }

    fn ask_target(&mut self) -> SplitResult<Answer<Option<ReferencePoint>>> {
        let prompt = TextPrompt {
            message: "New branch for the commits (empty to keep only the patch files)",
            placeholder: Some("feature/split"),
            default: None,
            validate: &optional_branch_validator,
        };
        Ok(match self.ui.ask_text(&prompt)? {
            Answer::Value(value) if value.is_empty() => Answer::Value(None),
            Answer::Value(value) => Answer::Value(Some(ReferencePoint::new(value)?)),
            Answer::Cancelled => Answer::Cancelled,
        })
    }

    /// Write the aggregate diff and read it back. `None` when it is empty.
    fn acquire_diff(&mut self, from: &ReferencePoint) -> SplitResult<Option<String>> {
        self.store.prepare()?;
        if self.options.clear_stale {
            self.store.clear_units()?;
        }

        self.ui.start(&format!("Computing diff against {from}"));
        let aggregate = self.store.aggregate_path().to_path_buf();
        let diff = match self.read_diff(from, &aggregate) {
            Ok(diff) => diff,
            Err(e) => {
                self.ui.stop("Computing the diff failed");
                return Err(e);
            }
        };
        self.transition(PipelineState::DiffAcquired);

        if diff.trim().is_empty() {
            self.ui.stop(&format!("No changes against {from}"));
            return Ok(None);
        }
        self.ui.stop(&format!(
            "Diff written to {} ({} bytes)",
            aggregate.display(),
            diff.len()
        ));
        Ok(Some(diff))
    }

    fn read_diff(&mut self, from: &ReferencePoint, path: &Path) -> SplitResult<String> {
        self.gateway.compute_diff(from, path)?;
        Ok(self.store.read_aggregate()?)
    }

    fn materialize(&mut self, units: &[CommitUnit]) -> SplitResult<Vec<PathBuf>> {
        let mut patches = Vec::with_capacity(units.len());
        for (i, unit) in units.iter().enumerate() {
            let path = self.store.unit_path(i, &unit.message);
            self.store.write(&path, &unit.patch_content)?;
            patches.push(path);
        }
        self.transition(PipelineState::Materialized);
        info!(count = patches.len(), dir = %self.store.units_dir().display(), "patches written");

        let listing = units
            .iter()
            .zip(&patches)
            .enumerate()
            .map(|(i, (unit, path))| format!("{}. {}\n   {}", i + 1, unit.message, path.display()))
            .collect::<Vec<_>>()
            .join("\n");
        self.ui.note("Proposed commits", &listing);
        Ok(patches)
    }

    /// Build `target` from `base` with one commit per unit.
    fn reconstruct(
        &mut self,
        base: &ReferencePoint,
        target: &ReferencePoint,
        units: &[CommitUnit],
        patches: &[PathBuf],
    ) -> SplitResult<usize> {
        let original = self.gateway.current_ref()?;
        let mode = self.apply_mode(base, &original)?;
        let mut tx = BranchTransaction {
            original,
            target: target.clone(),
            applied: 0,
        };
        self.transition(PipelineState::Reconstructing);
        info!(original = %tx.original, target = %tx.target, base = %base, ?mode, "reconstructing");

        self.gateway.switch_to(base)?;
        if let Err(e) = self.gateway.create_branch(target, base) {
            self.rollback(&tx);
            return Err(e.into());
        }
        if mode == ApplyMode::IndexOnly
            && let Err(e) = self.gateway.unstage_all()
        {
            self.rollback(&tx);
            return Err(e.into());
        }

        let total = units.len();
        self.ui.start(&format!("Committing to {target}"));
        for (i, (unit, patch)) in units.iter().zip(patches).enumerate() {
            if let Err(cause) = self.replay(unit, patch, mode) {
                self.ui.stop(&format!("Commit {}/{total} failed", i + 1));
                let rollback = self.rollback(&tx);
                return Err(ReconstructionError {
                    unit: i + 1,
                    total,
                    message: unit.message.clone(),
                    target: target.to_string(),
                    committed: tx.applied,
                    cause,
                    rollback,
                }
                .into());
            }
            tx.applied += 1;
            debug!(unit = i + 1, total, message = %unit.message, "committed");
        }

        self.gateway.switch_to(&tx.original)?;
        self.transition(PipelineState::Reconstructed);
        self.ui
            .stop(&format!("Created {} commit(s) on {target}", tx.applied));
        Ok(tx.applied)
    }

    /// How patches reach the target branch given the state of the work tree.
    ///
    /// A clean tree takes patches into index and work tree. Uncommitted
    /// changes already hold the aggregate diff when the base is the commit
    /// being worked on, so patches go to the index only. Any other base
    /// would carry those changes onto an unrelated commit.
    fn apply_mode(
        &mut self,
        base: &ReferencePoint,
        original: &ReferencePoint,
    ) -> Result<ApplyMode, GitError> {
        if !self.gateway.has_local_changes()? {
            return Ok(ApplyMode::WorkTree);
        }
        if self.gateway.commit_id(base)? == self.gateway.commit_id(original)? {
            return Ok(ApplyMode::IndexOnly);
        }
        Err(GitError::DirtyWorkTree {
            base: base.to_string(),
        })
    }

    fn replay(
        &mut self,
        unit: &CommitUnit,
        patch: &Path,
        mode: ApplyMode,
    ) -> Result<(), GitError> {
        self.gateway.apply_patch(patch, mode)?;
        self.gateway.commit(&unit.message, self.options.commit)
    }

    /// Best-effort switch back to where the run started.
    ///
    /// Returns the failure text when switching back fails too.
    fn rollback(&mut self, tx: &BranchTransaction) -> Option<String> {
        warn!(original = %tx.original, target = %tx.target, committed = tx.applied, "rolling back");
        match self.gateway.switch_to(&tx.original) {
            Ok(()) => {
                info!(branch = %tx.original, "switched back");
                None
            }
            Err(e) => {
                error!(branch = %tx.original, error = %e, "could not switch back");
                Some(e.to_string())
            }
        }
    }
}
