// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                 SplitError (~24 bytes)
//!                        |
//!   +------+------+------+------+------+------+------+
//!   |      |      |      |      |      |      |      |
//!   v      v      v      v      v      v      v      v
//! Valid   Git   Store  Model Contract Cfg  Recon  Io/Other
//!  Box    Box    Box    Box    Box    Box   Box   Box<str>
//!
//! Taxonomy:
//!   validation   ValidationError   bad ref names, rejected at the prompt
//!   environment  GitError          failing git operation (ref, dirty tree, apply)
//!   contract     ContractError     model output breaks the CommitUnit schema
//!   persistence  StoreError        patch files cannot be written/read
//!   model        ModelError        transport, HTTP status, timeout
//! ```

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SplitError`].
pub type SplitResult<T> = std::result::Result<T, SplitError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
/// Each variant prints its sub-error inline and reports no further source,
/// so an `{:#}` chain names the cause once.
#[derive(Debug, Error)]
pub enum SplitError {
    /// User input rejected before any I/O.
    #[error("validation error: {0}")]
    Validation(Box<ValidationError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(Box<GitError>),

    /// Patch persistence failed.
    #[error("store error: {0}")]
    Store(Box<StoreError>),

    /// Generative model call failed.
    #[error("model error: {0}")]
    Model(Box<ModelError>),

    /// Model output violated the decomposition contract.
    #[error("contract violation: {0}")]
    Contract(Box<ContractError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(Box<ConfigError>),

    /// Applying or committing a unit failed during branch reconstruction.
    #[error("{0}")]
    Reconstruction(Box<ReconstructionError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl SplitError {
    /// Build a [`SplitError::Other`] from any message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into().into_boxed_str())
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SplitError {
                fn from(err: $error) -> Self {
                    SplitError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ValidationError => Validation,
    GitError => Git,
    StoreError => Store,
    ModelError => Model,
    ContractError => Contract,
    ConfigError => Config,
    ReconstructionError => Reconstruction,
    std::io::Error => Io,
}

// --- Validation Errors ---

/// Input rejected at the interactive boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing was entered where a value is required.
    #[error("please enter a branch name or commit hash")]
    Empty,

    /// The value contains characters outside the ref grammar.
    #[error("'{0}' is not a valid branch name or commit hash")]
    InvalidRef(String),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// `git` is not installed or not on PATH.
    #[error("git executable not found in PATH")]
    GitNotFound,

    /// Path is not inside a git work tree.
    #[error("not a git repository: {path}")]
    RepoNotFound { path: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Reference point does not resolve to a commit.
    #[error("reference not found: {reference}")]
    RefNotFound { reference: String },

    /// Branch already exists and cannot be created.
    #[error("branch already exists: {branch}")]
    BranchExists { branch: String },

    /// HEAD could not be read.
    #[error("failed to read HEAD: {message}")]
    Head { message: String },

    /// Uncommitted changes would be carried onto a different base.
    #[error(
        "the work tree has uncommitted changes; commit or stash them, or split from the current commit instead of '{base}'"
    )]
    DirtyWorkTree { base: String },

    /// Commit refused because the message is blank.
    #[error("refusing to commit with an empty message")]
    EmptyCommitMessage,
}

// --- Store Errors ---

/// Diff store persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Directory could not be created.
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Patch content could not be written.
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Patch content could not be read.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stale patch could not be removed.
    #[error("failed to remove '{path}': {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- Model Errors ---

/// Generative model errors.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Non-success HTTP response.
    #[error("model endpoint returned {status}: {body}")]
    Http { status: u16, body: String },

    /// Error from reqwest library.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// No response within the configured time.
    #[error("no response after {0:?}")]
    Timeout(Duration),

    /// Response envelope missing the expected fields.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Provider name not recognised.
    #[error("unknown model provider '{0}' (supported: ollama)")]
    UnknownProvider(String),
}

// --- Contract Errors ---

/// Model output that breaks the decomposition contract.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Output is not the expected JSON shape.
    #[error("output does not match the commit schema: {0}")]
    Schema(#[from] serde_json::Error),

    /// The model returned no commits at all.
    #[error("the model returned no commits")]
    EmptyDecomposition,

    /// A commit has a blank message.
    #[error("commit {index} has an empty message")]
    EmptyMessage { index: usize },

    /// A commit's patch is not a unified diff.
    #[error("commit {index} ('{message}') is not a unified diff")]
    NotAUnifiedDiff { index: usize, message: String },

    /// The patches do not add up to the aggregate diff.
    #[error(
        "patches do not reconstruct the original diff (expected {expected} bytes, got {actual}, first difference at byte {offset})"
    )]
    Incomplete {
        expected: usize,
        actual: usize,
        offset: usize,
    },
}

// --- Reconstruction Errors ---

/// Failure while replaying commit units onto the target branch.
#[derive(Debug, Error)]
#[error(
    "failed to apply commit {unit}/{total} ('{message}') on '{target}': {cause}; {committed} commit(s) already created{}",
    rollback_note(.rollback.as_deref())
)]
pub struct ReconstructionError {
    /// 1-based index of the failing unit.
    pub unit: usize,
    /// Total number of units.
    pub total: usize,
    /// Message of the failing unit.
    pub message: String,
    /// Target branch being built.
    pub target: String,
    /// Commits created before the failure.
    pub committed: usize,
    /// Underlying git failure.
    pub cause: GitError,
    /// Rollback failure, if switching back also failed.
    pub rollback: Option<String>,
}

fn rollback_note(rollback: Option<&str>) -> String {
    rollback.map_or_else(String::new, |err| {
        format!("; switching back to the original branch also failed: {err}")
    })
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config: {message}")]
    ParseError { message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Malformed `--set` override.
    #[error("invalid override '{0}' (expected section.key=value)")]
    InvalidOverride(String),
}
