// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional("pr-splitter.toml")
//!   .add_toml_file(--ini)
//!   .with_env_prefix("PR_SPLITTER")
//!   .apply_overrides(--set)
//!        |
//!        v
//!    build() --> Config (validated)
//! ```

use std::path::{Path, PathBuf};

use config::{File, FileFormat};

use super::Config;
use crate::error::{ConfigError, Result};

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a TOML file that must exist when `build()` runs.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    /// Adds a TOML file that is skipped when missing.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    /// Read `<PREFIX>_<SECTION>__<KEY>` environment variables.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or if the value cannot be converted
    /// to a configuration value.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        Ok(self)
    }

    /// Apply `section.key=value` overrides in order.
    ///
    /// Values stay strings; the `config` crate converts them to the field's
    /// type during deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] for an entry without `=` or
    /// without a `section.key` name.
    pub fn apply_overrides<S: AsRef<str>>(self, overrides: &[S]) -> Result<Self> {
        let mut loader = self;
        for entry in overrides {
            let (key, value) = parse_override(entry.as_ref())?;
            loader = loader.set(key, value)?;
        }
        Ok(loader)
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - The merged configuration cannot be deserialized into the `Config` struct.
    /// - [`Config::validate`] rejects a value.
    pub fn build(self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let cfg = builder.build()?;
        let config: Config = cfg.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.files.clone()
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `section.key=value` into key and value.
fn parse_override(entry: &str) -> std::result::Result<(&str, &str), ConfigError> {
    let invalid = || ConfigError::InvalidOverride(entry.to_string());
    let (key, value) = entry.split_once('=').ok_or_else(invalid)?;
    let key = key.trim();
    match key.split_once('.') {
        Some((section, name)) if !section.is_empty() && !name.is_empty() => {
            Ok((key, value.trim()))
        }
        _ => Err(invalid()),
    }
}
