// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --ini FILE        ← Additional config files (can repeat)
//! --log-level N     ← Console verbosity (0-5)
//! --file-log-level  ← File verbosity (defaults to --log-level)
//! --log-file FILE   ← Enable file logging
//! --set KEY=VAL     ← Direct config override, section.key=value
//!
//! Precedence: CLI flags > --set > env > --ini > pr-splitter.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'i', long = "ini", value_name = "FILE", action = clap::ArgAction::Append)]
    pub inis: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub log_level: Option<u8>,

    /// File log level, defaults to --log-level.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Sets an option, such as 'model.name=qwen2.5-coder' or 'git.skip_hooks=false'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append)]
    pub options: Vec<String>,
}

impl GlobalOptions {
    /// Converts command-line options to `section.key=value` overrides.
    ///
    /// `--set` entries come first so the dedicated flags win.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(format!("global.output_log_level={level}"));
        }

        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(format!("global.file_log_level={level}"));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(format!("global.log_file={}", path.display()));
        }

        overrides
    }
}
