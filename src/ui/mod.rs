// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive collaborator.
//!
//! ```text
//! Pipeline --&mut--> Interaction
//!                      ask_text   TextPrompt + validator -> Answer<String>
//!                      confirm    yes/no                 -> Answer<bool>
//!                      start/stop spinner
//!                      note       titled block of text
//!                         |
//!                      Terminal (rustyline editor, indicatif spinner)
//! ```
//!
//! Ctrl-C or Ctrl-D at any prompt yields [`Answer::Cancelled`]; the pipeline
//! turns that into an abort without touching the repository.

#[cfg(test)]
mod tests;

use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::error::{SplitError, SplitResult};
use crate::refname::validate_ref_name;

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    /// The user answered.
    Value(T),
    /// The user pressed Ctrl-C or Ctrl-D.
    Cancelled,
}

impl<T> Answer<T> {
    /// The answer, or `None` when cancelled.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Cancelled => None,
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A free-text question.
pub struct TextPrompt<'a> {
    pub message: &'a str,
    /// Example value shown when there is no default.
    pub placeholder: Option<&'a str>,
    /// Value used for an empty answer.
    pub default: Option<&'a str>,
    /// Checks an answer; `Err` carries the message shown before re-prompting.
    pub validate: &'a dyn Fn(&str) -> Result<(), String>,
}

impl std::fmt::Debug for TextPrompt<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPrompt")
            .field("message", &self.message)
            .field("placeholder", &self.placeholder)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

impl TextPrompt<'_> {
    /// The line shown to the user.
    #[must_use]
    pub fn render(&self) -> String {
        match (self.default, self.placeholder) {
            (Some(default), _) => format!("{} [{default}]: ", self.message),
            (None, Some(placeholder)) => format!("{} (e.g. {placeholder}): ", self.message),
            (None, None) => format!("{}: ", self.message),
        }
    }

    /// Apply the default and the validator to raw input.
    ///
    /// # Errors
    ///
    /// Returns the validator's message when the answer is rejected.
    pub fn resolve(&self, input: &str) -> Result<String, String> {
        let input = input.trim();
        let value = match (input.is_empty(), self.default) {
            (true, Some(default)) => default,
            _ => input,
        };
        (self.validate)(value)?;
        Ok(value.to_string())
    }
}

/// Everything the pipeline needs from the person running it.
pub trait Interaction {
    /// Ask for text until the validator accepts it.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn ask_text(&mut self, prompt: &TextPrompt<'_>) -> SplitResult<Answer<String>>;

    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn confirm(&mut self, message: &str, default: bool) -> SplitResult<Answer<bool>>;

    /// Show progress for a long-running step.
    fn start(&mut self, message: &str);

    /// End the current step with a closing message.
    fn stop(&mut self, message: &str);

    /// Print a titled block of text.
    fn note(&mut self, title: &str, body: &str);
}

/// Validator for the reference point prompt.
///
/// # Errors
///
/// Returns the reason `input` is not a usable branch or commit.
pub fn reference_validator(input: &str) -> Result<(), String> {
    validate_ref_name(input).map_err(|e| e.to_string())
}

/// Validator for the target branch prompt: empty means "do not apply".
///
/// # Errors
///
/// Returns the reason a non-empty `input` is not a usable branch name.
pub fn optional_branch_validator(input: &str) -> Result<(), String> {
    if input.is_empty() {
        Ok(())
    } else {
        reference_validator(input)
    }
}

/// Interpret a yes/no answer. `None` means ask again.
#[must_use]
pub fn parse_confirmation(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        })
        .clone()
}

/// Interactive terminal front end.
pub struct Terminal {
    editor: DefaultEditor,
    spinner: Option<ProgressBar>,
}

impl Terminal {
    /// Open a line editor on the controlling terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the line editor cannot be initialized.
    pub fn new() -> SplitResult<Self> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self {
            editor,
            spinner: None,
        })
    }

    fn read_line(&mut self, prompt: &str) -> SplitResult<Option<String>> {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                debug!("prompt cancelled");
                Ok(None)
            }
            Err(e) => Err(readline_error(e)),
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

fn readline_error(err: ReadlineError) -> SplitError {
    match err {
        ReadlineError::Io(e) => e.into(),
        other => SplitError::other(format!("terminal input failed: {other}")),
    }
}

impl Interaction for Terminal {
    fn ask_text(&mut self, prompt: &TextPrompt<'_>) -> SplitResult<Answer<String>> {
        let line = prompt.render();
        loop {
            let Some(input) = self.read_line(&line)? else {
                return Ok(Answer::Cancelled);
            };
            match prompt.resolve(&input) {
                Ok(value) => return Ok(Answer::Value(value)),
                Err(message) => eprintln!("  {message}"),
            }
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> SplitResult<Answer<bool>> {
        let hint = if default { "Y/n" } else { "y/N" };
        let line = format!("{message} [{hint}] ");
        loop {
            let Some(input) = self.read_line(&line)? else {
                return Ok(Answer::Cancelled);
            };
            if let Some(answer) = parse_confirmation(&input, default) {
                return Ok(Answer::Value(answer));
            }
            eprintln!("  please answer y or n");
        }
    }

    fn start(&mut self, message: &str) {
        if let Some(previous) = self.spinner.take() {
            previous.finish_and_clear();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn stop(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        eprintln!("✔ {message}");
    }

    fn note(&mut self, title: &str, body: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.suspend(|| print_note(title, body));
        } else {
            print_note(title, body);
        }
    }
}

fn print_note(title: &str, body: &str) {
    println!("\n{title}");
    for line in body.lines() {
        println!("  {line}");
    }
    println!();
}
