// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!            gateway.rs
//!     VcsGateway (trait, &mut self)
//!         Repository { workdir }
//!                 |
//!      ,------------------,
//!      | backend (traits) |
//!      '--+----------+----'
//!         |          |
//!         v          v
//!    GitQuery    GitMutation
//!   (gix, read)  (CLI, write)
//!         |          |
//!         v          v
//!    GixBackend  ShellBackend
//!    .branch     .diff_to_file / .has_tracked_changes
//!    .head       .switch / .switch_detached
//!    .resolves   .create_branch
//!    .object_id  .apply / .reset_index
//!    .has_branch .commit
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for everything that writes.

pub mod backend;
pub mod gateway;

pub use gateway::{ApplyMode, CommitOptions, Repository, VcsGateway};
