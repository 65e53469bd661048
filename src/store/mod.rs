// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Diff store: the on-disk working directory for one run.
//!
//! ```text
//! <root>/                          (workspace.root, default "pr-splitter")
//!   pr-splitter-all-diff.patch     aggregate diff
//!   ai-commits/                    (workspace.units_dir)
//!     001-add-config.patch
//!     002-fix-typo.patch
//!     003-fix-typo.patch           same message, distinct file
//! ```
//!
//! Unit files are named `NNN-<slug>.patch`: the 1-based index keeps names
//! unique and directory order equal to commit order.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::config::types::WorkspaceConfig;
use crate::error::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Maximum slug length taken from a commit message.
const MAX_SLUG_LEN: usize = 60;

/// Extension of every file the store writes.
const PATCH_EXTENSION: &str = "patch";

/// Create `path` and its parents if missing. No-op when it already exists.
///
/// # Errors
///
/// Returns [`StoreError::CreateDir`] if the directory cannot be created.
pub fn ensure_directory(path: &Path) -> StoreResult<()> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|source| StoreError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Turn a commit message into a filesystem-safe name fragment.
///
/// Lower-cases ASCII letters, collapses every run of other characters into a
/// single `-`, trims dashes and caps the length. Never returns an empty string.
#[must_use]
pub fn slugify(message: &str) -> String {
    let mut slug = String::with_capacity(message.len().min(MAX_SLUG_LEN));
    let mut pending_dash = false;

    for c in message.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
            if slug.len() >= MAX_SLUG_LEN {
                break;
            }
        } else {
            pending_dash = true;
        }
    }

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "commit".to_string()
    } else {
        slug.to_string()
    }
}

/// File name for the unit at `index` (0-based) with `message`.
#[must_use]
pub fn unit_file_name(index: usize, message: &str) -> String {
    format!("{:03}-{}.{PATCH_EXTENSION}", index + 1, slugify(message))
}

/// Reads and writes patch files under the run's working directory.
#[derive(Debug, Clone)]
pub struct DiffStore {
    root: PathBuf,
    units_dir: PathBuf,
    aggregate: PathBuf,
}

impl DiffStore {
    /// Build a store from the workspace configuration, relative to `base`.
    #[must_use]
    pub fn new(base: &Path, workspace: &WorkspaceConfig) -> Self {
        let root = base.join(&workspace.root);
        Self {
            units_dir: root.join(&workspace.units_dir),
            aggregate: root.join(&workspace.aggregate_file),
            root,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn units_dir(&self) -> &Path {
        &self.units_dir
    }

    /// Path the aggregate diff is written to.
    #[must_use]
    pub fn aggregate_path(&self) -> &Path {
        &self.aggregate
    }

    /// Path of the unit file at `index` (0-based).
    #[must_use]
    pub fn unit_path(&self, index: usize, message: &str) -> PathBuf {
        self.units_dir.join(unit_file_name(index, message))
    }

    /// Create the root and units directories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CreateDir`] if either directory cannot be created.
    pub fn prepare(&self) -> StoreResult<()> {
        ensure_directory(&self.root)?;
        ensure_directory(&self.units_dir)
    }

    /// Write `content` to `path`, replacing it atomically.
    ///
    /// Content goes to a temporary file in the same directory first, so a
    /// failed write never leaves a truncated patch behind.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file cannot be written.
    pub fn write(&self, path: &Path, content: &str) -> StoreResult<()> {
        let write_err = |source: std::io::Error| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };
        let dir = path.parent().unwrap_or(&self.root);
        ensure_directory(dir)?;

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
        file.persist(path).map_err(|e| write_err(e.error))?;
        trace!(path = %path.display(), bytes = content.len(), "wrote patch");
        Ok(())
    }

    /// Read a patch back.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file is missing or unreadable.
    pub fn read(&self, path: &Path) -> StoreResult<String> {
        std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read the aggregate diff.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if it has not been written.
    pub fn read_aggregate(&self) -> StoreResult<String> {
        self.read(&self.aggregate)
    }

    /// Remove `*.patch` files left in the units directory by an earlier run.
    ///
    /// Returns how many files were removed. Other files are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the directory cannot be listed and
    /// [`StoreError::Remove`] if a file cannot be deleted.
    pub fn clear_units(&self) -> StoreResult<usize> {
        let entries = match std::fs::read_dir(&self.units_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.units_dir.clone(),
                    source,
                });
            }
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry
                .map_err(|source| StoreError::Read {
                    path: self.units_dir.clone(),
                    source,
                })?
                .path();
            let is_patch = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == PATCH_EXTENSION);
            if !is_patch {
                continue;
            }
            std::fs::remove_file(&path).map_err(|source| StoreError::Remove {
                path: path.clone(),
                source,
            })?;
            removed += 1;
        }

        if removed > 0 {
            debug!(removed, dir = %self.units_dir.display(), "cleared stale patches");
        }
        Ok(removed)
    }
}
