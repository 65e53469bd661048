// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for pr-splitter.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. pr-splitter.toml (cwd, optional)
//! 3. --ini FILE (repeatable)
//! 4. PR_SPLITTER_* env vars
//! 5. --set section.key=value, then dedicated CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! PR_SPLITTER_MODEL__NAME=qwen2.5-coder    → model.name = "qwen2.5-coder"
//! PR_SPLITTER_MODEL__TIMEOUT_SECS=600      → model.timeout_secs = 600
//! PR_SPLITTER_WORKSPACE__ROOT=/tmp/split   → workspace.root = "/tmp/split"
//! ```
//!
//! Sections are separated from keys by a double underscore so that keys
//! containing `_` survive the mapping.

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{GitConfig, GlobalConfig, ModelConfig, SUPPORTED_PROVIDERS, WorkspaceConfig};

/// Name of the configuration file picked up from the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "pr-splitter.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "PR_SPLITTER";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Generative model settings.
    pub model: ModelConfig,
    /// Patch directory layout.
    pub workspace: WorkspaceConfig,
    /// Git behaviour.
    pub git: GitConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pr_splitter::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("pr-splitter.toml")
    ///     .with_env_prefix("PR_SPLITTER")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown model provider, a
    /// zero timeout, or an empty workspace name.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |section: &str, key: &str, message: String| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message,
        };

        if !SUPPORTED_PROVIDERS.contains(&self.model.provider.as_str()) {
            return Err(invalid(
                "model",
                "provider",
                format!(
                    "unknown provider '{}', expected one of: {}",
                    self.model.provider,
                    SUPPORTED_PROVIDERS.join(", ")
                ),
            ));
        }
        if self.model.timeout_secs == 0 {
            return Err(invalid(
                "model",
                "timeout_secs",
                "must be greater than 0".to_string(),
            ));
        }
        if self.model.name.trim().is_empty() {
            return Err(invalid("model", "name", "must not be empty".to_string()));
        }

        if self.workspace.root.as_os_str().is_empty() {
            return Err(invalid("workspace", "root", "must not be empty".to_string()));
        }
        for (key, value) in [
            ("units_dir", &self.workspace.units_dir),
            ("aggregate_file", &self.workspace.aggregate_file),
        ] {
            if value.trim().is_empty() {
                return Err(invalid("workspace", key, "must not be empty".to_string()));
            }
        }
        if self.workspace.units_dir == self.workspace.aggregate_file {
            return Err(invalid(
                "workspace",
                "units_dir",
                "must differ from aggregate_file".to_string(),
            ));
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_model_options(&mut options);
        self.format_workspace_options(&mut options);
        options.insert("git.skip_hooks".into(), self.git.skip_hooks.to_string());

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }

    fn format_model_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("model.provider".into(), self.model.provider.clone());
        options.insert("model.base_url".into(), self.model.base_url.clone());
        options.insert("model.name".into(), self.model.name.clone());
        options.insert(
            "model.timeout_secs".into(),
            self.model.timeout_secs.to_string(),
        );
        options.insert(
            "model.temperature".into(),
            self.model.temperature.to_string(),
        );
        options.insert(
            "model.verify_completeness".into(),
            self.model.verify_completeness.to_string(),
        );
    }

    fn format_workspace_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "workspace.root".into(),
            self.workspace.root.display().to_string(),
        );
        options.insert(
            "workspace.units_dir".into(),
            self.workspace.units_dir.clone(),
        );
        options.insert(
            "workspace.aggregate_file".into(),
            self.workspace.aggregate_file.clone(),
        );
        options.insert(
            "workspace.clear_stale".into(),
            self.workspace.clear_stale.to_string(),
        );
    }
}
