// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> ConfigLoader --> Logging --> Command Dispatch
//!   Split | Options | Inis | Version
//! ```

use std::process::ExitCode;

use pr_splitter::cli::global::GlobalOptions;
use pr_splitter::cli::{self, Command};
use pr_splitter::cmd::config::{run_inis_command, run_options_command};
use pr_splitter::cmd::split::run_split_command;
use pr_splitter::config::loader::ConfigLoader;
use pr_splitter::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use pr_splitter::error::Result;
use pr_splitter::logging::init_logging;
use pr_splitter::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let config = load_config(&cli);
    let log_config = match &config {
        Ok(config) => log_config_from(config),
        Err(_) => log_config_from_flags(&cli.global),
    };
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config).await
}

fn log_config_from(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .build()
}

fn log_config_from_flags(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::WARN);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: Result<Config>) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => config.map(|config| run_options_command(&config)),
        Some(Command::Inis) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(Command::Split(args)) => match config {
            Ok(config) => run_split_command(args, &config).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_CONFIG_FILE);
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(cli: &cli::Cli) -> Result<Config> {
    let mut overrides = cli.global.to_config_overrides();
    if let Some(Command::Split(args)) = &cli.command {
        overrides.extend(args.to_config_overrides());
    }

    build_config_loader(&cli.global)
        .apply_overrides(&overrides)
        .and_then(ConfigLoader::build)
        .map_err(|e| e.context("failed to load config"))
}
