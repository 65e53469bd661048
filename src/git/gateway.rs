// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Version control gateway.
//!
//! ```text
//! Pipeline --&mut--> VcsGateway
//!                        |
//!                   Repository { workdir }
//!                    /            \
//!              GixBackend      ShellBackend
//!   current_ref/resolve/commit_id  diff/switch/branch/apply/commit
//!                                  has_local_changes/unstage_all
//! ```
//!
//! The working tree, index and HEAD are shared process-wide state, so every
//! method takes `&mut self`: holding the gateway is holding the tree.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::backend::{GitMutation, GitQuery, GitResult, GixBackend, ShellBackend};
use crate::error::GitError;
use crate::refname::ReferencePoint;

/// Options for [`VcsGateway::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOptions {
    /// Pass `--no-verify` so pre-commit and commit-msg hooks do not run.
    pub skip_hooks: bool,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self { skip_hooks: true }
    }
}

/// Where [`VcsGateway::apply_patch`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// Index and working tree, which must match each other (`git apply --index`).
    #[default]
    WorkTree,
    /// Index only (`git apply --cached`), for a working tree that already
    /// holds the changes.
    IndexOnly,
}

/// Repository operations needed to split and replay a diff.
///
/// Each call either succeeds or reports why it failed.
pub trait VcsGateway {
    /// Checked-out branch, or the HEAD commit id when detached.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD cannot be read.
    fn current_ref(&mut self) -> GitResult<ReferencePoint>;

    /// Ensure a reference point resolves to a real object.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if it does not.
    fn resolve(&mut self, reference: &ReferencePoint) -> GitResult<()>;

    /// Object id a reference point names.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if it does not resolve.
    fn commit_id(&mut self, reference: &ReferencePoint) -> GitResult<String>;

    /// Whether tracked files have uncommitted changes, staged or not.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the status cannot be read.
    fn has_local_changes(&mut self) -> GitResult<bool>;

    /// Write the diff between the working tree and `from` to `output`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `from` does not resolve or git fails.
    fn compute_diff(&mut self, from: &ReferencePoint, output: &Path) -> GitResult<()>;

    /// Check out a branch or commit.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the ref is unknown or uncommitted changes conflict.
    fn switch_to(&mut self, reference: &ReferencePoint) -> GitResult<()>;

    /// Create `name` at `base` and check it out.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::BranchExists`] if `name` already exists.
    fn create_branch(&mut self, name: &ReferencePoint, base: &ReferencePoint) -> GitResult<()>;

    /// Apply a patch file and stage the result.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the patch is malformed or does not apply cleanly.
    fn apply_patch(&mut self, patch: &Path, mode: ApplyMode) -> GitResult<()>;

    /// Drop everything staged, keeping the working tree.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn unstage_all(&mut self) -> GitResult<()>;

    /// Commit what is staged.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the message is blank or nothing is staged.
    fn commit(&mut self, message: &str, options: CommitOptions) -> GitResult<()>;
}

/// Gateway over a real repository on disk.
#[derive(Debug)]
pub struct Repository {
    workdir: PathBuf,
}

impl Repository {
    /// Open the repository containing `path`.
    ///
    /// Commands run from the top of the work tree so patch paths resolve the
    /// same way `git diff` wrote them.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::GitNotFound`] if `git` is not on PATH and
    /// [`GitError::RepoNotFound`] if `path` is not inside a work tree.
    pub fn open(path: impl Into<PathBuf>) -> GitResult<Self> {
        let path = path.into();
        which::which("git").map_err(|_| GitError::GitNotFound)?;
        let workdir = GixBackend::toplevel(&path)?;
        debug!(path = %workdir.display(), "opened repository");
        Ok(Self { workdir })
    }

    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl VcsGateway for Repository {
    fn current_ref(&mut self) -> GitResult<ReferencePoint> {
        let reference = match GixBackend::current_branch(&self.workdir)? {
            Some(branch) => branch,
            None => GixBackend::head_commit(&self.workdir)?,
        };
        debug!(reference = %reference, "current ref");
        Ok(ReferencePoint::from_repository(reference))
    }

    fn resolve(&mut self, reference: &ReferencePoint) -> GitResult<()> {
        if GixBackend::resolves(&self.workdir, reference.as_str())? {
            Ok(())
        } else {
            Err(GitError::RefNotFound {
                reference: reference.to_string(),
            })
        }
    }

    fn commit_id(&mut self, reference: &ReferencePoint) -> GitResult<String> {
        GixBackend::object_id(&self.workdir, reference.as_str())?.ok_or_else(|| {
            GitError::RefNotFound {
                reference: reference.to_string(),
            }
        })
    }

    fn has_local_changes(&mut self) -> GitResult<bool> {
        let dirty = ShellBackend::has_tracked_changes(&self.workdir)?;
        debug!(dirty, "work tree status");
        Ok(dirty)
    }

    fn compute_diff(&mut self, from: &ReferencePoint, output: &Path) -> GitResult<()> {
        info!(from = %from, output = %output.display(), "computing diff");
        ShellBackend::diff_to_file(&self.workdir, from.as_str(), output)
    }

    fn switch_to(&mut self, reference: &ReferencePoint) -> GitResult<()> {
        if GixBackend::local_branch_exists(&self.workdir, reference.as_str())? {
            info!(branch = %reference, "switching branch");
            ShellBackend::switch(&self.workdir, reference.as_str())
        } else {
            info!(revision = %reference, "detaching HEAD");
            ShellBackend::switch_detached(&self.workdir, reference.as_str())
        }
    }

    fn create_branch(&mut self, name: &ReferencePoint, base: &ReferencePoint) -> GitResult<()> {
        if GixBackend::local_branch_exists(&self.workdir, name.as_str())? {
            return Err(GitError::BranchExists {
                branch: name.to_string(),
            });
        }
        info!(branch = %name, base = %base, "creating branch");
        ShellBackend::create_branch(&self.workdir, name.as_str(), base.as_str())
    }

    fn apply_patch(&mut self, patch: &Path, mode: ApplyMode) -> GitResult<()> {
        debug!(patch = %patch.display(), ?mode, "applying patch");
        ShellBackend::apply(&self.workdir, patch, mode == ApplyMode::IndexOnly)
    }

    fn unstage_all(&mut self) -> GitResult<()> {
        debug!("resetting index to HEAD");
        ShellBackend::reset_index(&self.workdir)
    }

    fn commit(&mut self, message: &str, options: CommitOptions) -> GitResult<()> {
        if message.trim().is_empty() {
            return Err(GitError::EmptyCommitMessage);
        }
        debug!(message, skip_hooks = options.skip_hooks, "committing");
        ShellBackend::commit(&self.workdir, message, options.skip_hooks)
    }
}
