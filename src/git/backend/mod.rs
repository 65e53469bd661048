// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend (pure Rust gix)
//! GitMutation (write) --> ShellBackend (git CLI)
//!                         + has_tracked_changes (git status)
//! ```

use crate::error::GitError;
use std::path::{Path, PathBuf};

/// Result type for backend operations.
pub type GitResult<T> = std::result::Result<T, GitError>;

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
///
/// Implementors provide methods to inspect repository state without modification.
pub trait GitQuery {
    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn current_branch(path: &Path) -> GitResult<Option<String>>;

    /// Get the full hash of the commit HEAD points at.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD cannot be resolved (e.g. unborn branch).
    fn head_commit(path: &Path) -> GitResult<String>;

    /// Check whether a revision resolves to an object.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened.
    fn resolves(path: &Path, revision: &str) -> GitResult<bool>;

    /// Full id of the object `revision` names, `None` if it does not resolve.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened.
    fn object_id(path: &Path, revision: &str) -> GitResult<Option<String>>;

    /// Check whether `refs/heads/<branch>` exists.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened.
    fn local_branch_exists(path: &Path, branch: &str) -> GitResult<bool>;
}

// --- Mutation Trait (Write operations) ---

/// Git operations that modify the working tree, index or refs.
pub trait GitMutation {
    /// Write `git diff <from>` (working tree against `from`) to `output`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `from` is unknown or the file cannot be written.
    fn diff_to_file(repo_path: &Path, from: &str, output: &Path) -> GitResult<()>;

    /// Switch to a local branch.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the branch does not exist or local changes conflict.
    fn switch(repo_path: &Path, branch: &str) -> GitResult<()>;

    /// Detach HEAD at a commit, tag or remote ref.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the revision does not exist or local changes conflict.
    fn switch_detached(repo_path: &Path, revision: &str) -> GitResult<()>;

    /// Create `branch` at `start_point` and switch to it.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the branch exists or `start_point` is unknown.
    fn create_branch(repo_path: &Path, branch: &str, start_point: &str) -> GitResult<()>;

    /// Apply a patch to the index, and to the working tree too unless
    /// `index_only` is set.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the patch is malformed or does not apply cleanly.
    fn apply(repo_path: &Path, patch: &Path, index_only: bool) -> GitResult<()>;

    /// Reset the index to HEAD, leaving the working tree alone.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn reset_index(repo_path: &Path) -> GitResult<()>;

    /// Commit the staged changes.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if nothing is staged or the commit is rejected.
    fn commit(repo_path: &Path, message: &str, no_verify: bool) -> GitResult<()>;
}

fn path_arg<'a>(path: &'a Path, command: &str) -> GitResult<&'a str> {
    path.to_str().ok_or_else(|| GitError::CommandFailed {
        command: command.to_string(),
        message: format!("path is not valid UTF-8: {}", path.display()),
    })
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Read-only, no subprocess.
pub struct GixBackend;

impl GixBackend {
    fn open(path: &Path) -> GitResult<gix::Repository> {
        gix::discover(path).map_err(|_| GitError::RepoNotFound {
            path: path.display().to_string(),
        })
    }

    /// Top-level directory of the work tree containing `path`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `path` is not inside a non-bare repository.
    pub fn toplevel(path: &Path) -> GitResult<PathBuf> {
        let repo = Self::open(path)?;
        repo.workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::RepoNotFound {
                path: path.display().to_string(),
            })
    }
}

impl GitQuery for GixBackend {
    fn current_branch(path: &Path) -> GitResult<Option<String>> {
        let repo = Self::open(path)?;
        let head = repo.head_name().map_err(|e| GitError::Head {
            message: e.to_string(),
        })?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn head_commit(path: &Path) -> GitResult<String> {
        let repo = Self::open(path)?;
        let id = repo.head_id().map_err(|e| GitError::Head {
            message: e.to_string(),
        })?;
        Ok(id.to_string())
    }

    fn resolves(path: &Path, revision: &str) -> GitResult<bool> {
        let repo = Self::open(path)?;
        Ok(repo.rev_parse_single(revision).is_ok())
    }

    fn object_id(path: &Path, revision: &str) -> GitResult<Option<String>> {
        let repo = Self::open(path)?;
        Ok(repo
            .rev_parse_single(revision)
            .ok()
            .map(|id| id.detach().to_string()))
    }

    fn local_branch_exists(path: &Path, branch: &str) -> GitResult<bool> {
        let repo = Self::open(path)?;
        let name = format!("refs/heads/{branch}");
        match repo.find_reference(name.as_str()) {
            Ok(_) => Ok(true),
            Err(gix::reference::find::existing::Error::NotFound { name: _ }) => Ok(false),
            Err(e) => Err(GitError::Head {
                message: e.to_string(),
            }),
        }
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using git CLI.
///
/// Every write goes through here: `git apply`, `git commit` and `git switch`
/// have no stable gix equivalent.
pub struct ShellBackend;

impl ShellBackend {
    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> GitResult<String> {
        use std::process::Command;

        tracing::trace!(cwd = %cwd.display(), "git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: format!("failed to execute git: {e}"),
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Whether tracked files differ from HEAD, staged or not.
    ///
    /// Untracked files are ignored.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git status` fails.
    pub fn has_tracked_changes(repo_path: &Path) -> GitResult<bool> {
        let status = Self::git_command(
            &["status", "--porcelain", "--untracked-files=no"],
            repo_path,
        )?;
        Ok(!status.is_empty())
    }
}

impl GitMutation for ShellBackend {
    fn diff_to_file(repo_path: &Path, from: &str, output: &Path) -> GitResult<()> {
        let output_arg = format!("--output={}", path_arg(output, "git diff")?);
        Self::git_command(
            &[
                "diff",
                "--no-color",
                "--no-ext-diff",
                "--binary",
                &output_arg,
                from,
                "--",
            ],
            repo_path,
        )?;
        Ok(())
    }

    fn switch(repo_path: &Path, branch: &str) -> GitResult<()> {
        Self::git_command(&["switch", "--quiet", branch], repo_path)?;
        Ok(())
    }

    fn switch_detached(repo_path: &Path, revision: &str) -> GitResult<()> {
        Self::git_command(&["switch", "--quiet", "--detach", revision], repo_path)?;
        Ok(())
    }

    fn create_branch(repo_path: &Path, branch: &str, start_point: &str) -> GitResult<()> {
        Self::git_command(
            &["switch", "--quiet", "--create", branch, start_point],
            repo_path,
        )?;
        Ok(())
    }

    fn apply(repo_path: &Path, patch: &Path, index_only: bool) -> GitResult<()> {
        let patch_str = path_arg(patch, "git apply")?;
        let target = if index_only { "--cached" } else { "--index" };
        Self::git_command(&["apply", target, patch_str], repo_path)?;
        Ok(())
    }

    fn reset_index(repo_path: &Path) -> GitResult<()> {
        Self::git_command(&["reset", "--quiet"], repo_path)?;
        Ok(())
    }

    fn commit(repo_path: &Path, message: &str, no_verify: bool) -> GitResult<()> {
        let mut args = vec!["commit", "--quiet", "-m", message];
        if no_verify {
            args.push("--no-verify");
        }
        Self::git_command(&args, repo_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
