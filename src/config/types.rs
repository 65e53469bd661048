// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! Config
//!   global     log levels, log file
//!   model      provider, endpoint, model name, timeout, temperature
//!   workspace  patch directory layout
//!   git        commit behaviour
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogLevel;

/// Providers `model.provider` may name.
pub const SUPPORTED_PROVIDERS: &[&str] = &["ollama"];

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file. No file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::WARN,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}

/// Generative model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Backend serving the model.
    pub provider: String,
    /// Base URL of the provider's HTTP API.
    pub base_url: String,
    /// Model to run.
    pub name: String,
    /// Upper bound on one generation request, in seconds.
    pub timeout_secs: u64,
    /// Sampling temperature.
    pub temperature: f64,
    /// Require the patches to concatenate back to the aggregate diff.
    pub verify_completeness: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            name: "llama3.1".to_string(),
            timeout_secs: 300,
            temperature: 0.0,
            verify_completeness: true,
        }
    }
}

impl ModelConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// On-disk layout of a run's patches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Working directory, relative to the repository top level.
    pub root: PathBuf,
    /// Subdirectory of `root` holding one patch per commit.
    pub units_dir: String,
    /// File name of the aggregate diff inside `root`.
    pub aggregate_file: String,
    /// Delete patches left by an earlier run before writing new ones.
    pub clear_stale: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("pr-splitter"),
            units_dir: "ai-commits".to_string(),
            aggregate_file: "pr-splitter-all-diff.patch".to_string(),
            clear_stale: true,
        }
    }
}

/// Git behaviour during reconstruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Commit with `--no-verify`.
    pub skip_hooks: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self { skip_hooks: true }
    }
}
