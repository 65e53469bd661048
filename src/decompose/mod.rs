// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Decomposition engine.
//!
//! ```text
//! aggregate diff
//!      |
//!      v
//! GenerationRequest { SYSTEM_PROMPT, diff, output_schema() }
//!      |  SplitModel::generate (one request, no retry)
//!      v
//! raw JSON --> parse_decomposition
//!                serde (deny_unknown_fields)
//!                at least one commit
//!                non-blank messages
//!                every patch a unified diff
//!                concat(patches) == diff   (verify_completeness)
//!      |
//!      v
//! Vec<CommitUnit>
//! ```
//!
//! Any check failing is fatal: nothing downstream re-validates the patches
//! before they are applied.


use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ContractError, SplitResult};
use crate::model::{GenerationRequest, SplitModel};

/// Instruction set sent with every diff.
pub const SYSTEM_PROMPT: &str = "\
You are an expert in Git and unified diffs. The user message is the complete diff of a pull request. \
Reorganize it into a sequence of commits:
1. Group the changes into separate commits, each one a single logical change.
2. For every commit, write a short message describing the change or its purpose, and the unified diff that belongs to it.
3. Every diff must be valid and apply cleanly with `git apply` on top of the previous commits, in order.
4. Answer only with a JSON object of the form {\"commits\": [{\"message\": string, \"patchContent\": string}]}.
5. Never change the code itself. Only split and order the existing diff content; taken together the patches must add up to the original diff exactly.
";

/// JSON schema of the answer, passed as the structured-output format.
#[must_use]
pub fn output_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "commits": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "patchContent": { "type": "string" }
                    },
                    "required": ["message", "patchContent"]
                }
            }
        },
        "required": ["commits"]
    })
}

/// One logical commit proposed by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommitUnit {
    /// Commit message.
    pub message: String,
    /// Unified diff for this commit alone.
    #[serde(alias = "diffFileContent")]
    pub patch_content: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Decomposition {
    commits: Vec<CommitUnit>,
}

/// Splits an aggregate diff into commit units through a model.
#[derive(Debug)]
pub struct DecompositionEngine<M> {
    model: M,
    verify_completeness: bool,
}

impl<M: SplitModel> DecompositionEngine<M> {
    #[must_use]
    pub const fn new(model: M, verify_completeness: bool) -> Self {
        Self {
            model,
            verify_completeness,
        }
    }

    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Ask the model for a decomposition of `diff` and validate it.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::Model` if the request fails and
    /// `SplitError::Contract` if the answer breaks the output contract.
    pub async fn decompose(&self, diff: &str) -> SplitResult<Vec<CommitUnit>> {
        let request = GenerationRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: diff.to_string(),
            schema: output_schema(),
        };

        info!(diff_bytes = diff.len(), "requesting decomposition");
        let raw = self.model.generate(&request).await?;
        debug!(raw_bytes = raw.len(), "received decomposition");

        let units = parse_decomposition(&raw, diff, self.verify_completeness)?;
        info!(units = units.len(), "decomposition accepted");
        Ok(units)
    }
}

/// Parse a raw answer and enforce the output contract against `diff`.
///
/// Messages come back trimmed; patch text is kept verbatim.
///
/// # Errors
///
/// Returns the first [`ContractError`] found.
pub fn parse_decomposition(
    raw: &str,
    diff: &str,
    verify_completeness: bool,
) -> Result<Vec<CommitUnit>, ContractError> {
    let Decomposition { commits } = serde_json::from_str(raw)?;
    if commits.is_empty() {
        return Err(ContractError::EmptyDecomposition);
    }

    let mut units = Vec::with_capacity(commits.len());
    for (i, unit) in commits.into_iter().enumerate() {
        let index = i + 1;
        let message = unit.message.trim().to_string();
        if message.is_empty() {
            return Err(ContractError::EmptyMessage { index });
        }
        if !is_unified_diff(&unit.patch_content) {
            return Err(ContractError::NotAUnifiedDiff { index, message });
        }
        units.push(CommitUnit {
            message,
            patch_content: unit.patch_content,
        });
    }

    if verify_completeness {
        check_completeness(diff, &units)?;
    }
    Ok(units)
}

/// Whether `patch` has a file header and at least one hunk or binary marker.
#[must_use]
pub fn is_unified_diff(patch: &str) -> bool {
    let mut git_header = false;
    let mut old_file = false;
    let mut file_pair = false;
    let mut body = false;

    for line in patch.lines() {
        if line.starts_with("diff --git ") {
            git_header = true;
        } else if line.starts_with("--- ") {
            old_file = true;
        } else if old_file && line.starts_with("+++ ") {
            file_pair = true;
        } else if line.starts_with("@@")
            || line == "GIT binary patch"
            || line.starts_with("Binary files ")
            || (git_header && is_content_free_change(line))
        {
            body = true;
        }
    }

    (git_header || file_pair) && body
}

/// Extended git headers that carry a whole change without any hunk: renames,
/// mode changes, and creation or deletion of empty files.
fn is_content_free_change(line: &str) -> bool {
    ["rename from ", "new file mode ", "deleted file mode ", "old mode "]
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

/// The ordered concatenation of all patches must equal `diff` byte for byte.
///
/// # Errors
///
/// Returns [`ContractError::Incomplete`] with the first differing offset.
pub fn check_completeness(diff: &str, units: &[CommitUnit]) -> Result<(), ContractError> {
    let joined: String = units.iter().map(|u| u.patch_content.as_str()).collect();
    if joined == diff {
        return Ok(());
    }

    let offset = joined
        .bytes()
        .zip(diff.bytes())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| joined.len().min(diff.len()));
    Err(ContractError::Incomplete {
        expected: diff.len(),
        actual: joined.len(),
        offset,
    })
}
