// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reference points: branch names and commit hashes.
//!
//! ```text
//! "main" / "origin/main" / "release-1.2" / "3f2a9c1"   ok
//! "" / "feature branch" / "main~1" / "HEAD^"           rejected
//! ```
//!
//! Grammar: `^[A-Za-z0-9_./-]+$`, ASCII only. Whether the ref actually
//! exists is checked later by the gateway, before anything is mutated.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;

fn ref_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_./-]+$").ok())
        .as_ref()
}

fn is_ref_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '-')
}

/// Check a value against the ref grammar.
///
/// # Errors
///
/// Returns [`ValidationError::Empty`] for blank input and
/// [`ValidationError::InvalidRef`] when the value has characters outside
/// ASCII letters, digits, `_`, `.`, `/` and `-`.
pub fn validate_ref_name(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty);
    }
    let matches = ref_pattern().map_or_else(
        || value.chars().all(is_ref_char),
        |pattern| pattern.is_match(value),
    );
    if !matches {
        return Err(ValidationError::InvalidRef(value.to_string()));
    }
    Ok(())
}

/// A validated branch name or commit hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferencePoint(String);

impl ReferencePoint {
    /// Validate and wrap a ref name.
    ///
    /// # Errors
    ///
    /// See [`validate_ref_name`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_ref_name(&value)?;
        Ok(Self(value))
    }

    /// Wrap a name read back from git (branch name or object id).
    pub(crate) fn from_repository(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ReferencePoint {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ReferencePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReferencePoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
