// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |            split / options / inis
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, env, --set layers |
//!              '-------------+-------------'
//!                            v
//!              ,-------------------------------,
//!              |           pipeline            |
//!              | Idle -> ... -> Reconstructed  |
//!              '--+-------+-------+-------+----'
//!                 |       |       |     |
//!                 v       v       v     v
//!               git     store  decompose  ui
//!             gix/CLI  patches    |    rustyline
//!                                 v    indicatif
//!                               model
//!                           Ollama (HTTP)
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging, refname   |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod decompose;
pub mod error;
pub mod git;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod refname;
pub mod store;
pub mod ui;
