// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for pr-splitter using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! pr-splitter [global options] <command>
//! split [--from REF] [--target BRANCH | --no-apply] [--yes]
//! options
//! inis
//! version
//! ```

pub mod global;
pub mod split;


use crate::cli::global::GlobalOptions;
use crate::cli::split::SplitArgs;
use clap::{Parser, Subcommand};

/// Split the changes of a branch into logical commits.
#[derive(Debug, Parser)]
#[command(
    name = "pr-splitter",
    author,
    version,
    about = "Split a branch into logical commits with a local model",
    long_about = "pr-splitter Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Diffs the working tree against a branch or commit, asks a model\n\
                  to group the changes into logical commits, writes one patch per\n\
                  commit and replays them on a new branch created from that\n\
                  reference point. If any patch fails to apply, pr-splitter switches\n\
                  back to the branch it started on.",
    after_help = "CONFIG FILES:\n\n\
                  pr-splitter reads `pr-splitter.toml` from the current directory\n\
                  if it exists, then every file given with --ini, then\n\
                  PR_SPLITTER_<SECTION>__<KEY> environment variables, then --set\n\
                  overrides. Run `pr-splitter options` to see the result."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the config files used.
    Inis,

    /// Splits the current changes into commits on a new branch.
    Split(SplitArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
