// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the config module with realistic TOML files and CLI overrides.

use std::fs;

use clap::Parser;
use pr_splitter::cli::{Cli, Command};
use pr_splitter::config::Config;
use pr_splitter::config::loader::ConfigLoader;
use pr_splitter::logging::LogLevel;
use pr_splitter::store::DiffStore;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

// =============================================================================
// Loading from files
// =============================================================================

#[test]
fn config_from_file_full() {
    let temp = temp_dir();
    let path = temp.path().join("pr-splitter.toml");
    fs::write(
        &path,
        r#"
[global]
output_log_level = 3

[model]
base_url = "http://gpu-box:11434"
name = "qwen2.5-coder:14b"
timeout_secs = 600

[workspace]
root = ".split"
units_dir = "units"

[git]
skip_hooks = false
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert_eq!(config.model.base_url, "http://gpu-box:11434");
    assert_eq!(config.model.name, "qwen2.5-coder:14b");
    assert_eq!(config.model.timeout_secs, 600);
    assert!(!config.git.skip_hooks);

    let store = DiffStore::new(temp.path(), &config.workspace);
    assert_eq!(store.root(), temp.path().join(".split"));
    assert_eq!(store.units_dir(), temp.path().join(".split").join("units"));
    assert_eq!(
        store.aggregate_path(),
        temp.path().join(".split").join("pr-splitter-all-diff.patch")
    );
}

#[test]
fn config_from_file_rejects_invalid_values() {
    let temp = temp_dir();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "[model]\nprovider = \"openai\"\n").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("openai"), "{err:#}");
}

// =============================================================================
// CLI overrides
// =============================================================================

#[test]
fn config_cli_overrides_win_over_ini() {
    let temp = temp_dir();
    let ini = temp.path().join("team.toml");
    fs::write(&ini, "[model]\nname = \"llama3.1:70b\"\n\n[global]\noutput_log_level = 1\n").unwrap();
    let ini = ini.display().to_string();

    let cli = Cli::try_parse_from([
        "pr-splitter",
        "-i",
        &ini,
        "-l",
        "4",
        "split",
        "--model",
        "mistral",
        "--work-dir",
        "tmp/split",
    ])
    .unwrap();

    let mut overrides = cli.global.to_config_overrides();
    if let Some(Command::Split(args)) = &cli.command {
        overrides.extend(args.to_config_overrides());
    }

    let mut loader = ConfigLoader::new();
    for path in &cli.global.inis {
        loader = loader.add_toml_file(path);
    }
    let config = loader.apply_overrides(&overrides).unwrap().build().unwrap();

    assert_eq!(config.model.name, "mistral");
    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.global.file_log_level, LogLevel::DEBUG);
    assert_eq!(config.workspace.root.to_str(), Some("tmp/split"));
}

#[test]
fn config_set_override_reaches_options() {
    let config = ConfigLoader::new()
        .apply_overrides(&["git.skip_hooks=false", "model.temperature=0.2"])
        .unwrap()
        .build()
        .unwrap();

    let options = config.format_options();
    assert!(
        options
            .iter()
            .any(|line| line.starts_with("git.skip_hooks") && line.ends_with("= false"))
    );
    assert!(
        options
            .iter()
            .any(|line| line.starts_with("model.temperature") && line.ends_with("= 0.2"))
    );
}
