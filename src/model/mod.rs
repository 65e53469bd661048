// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Generative model collaborator.
//!
//! ```text
//! DecompositionEngine
//!        |  GenerationRequest { system, prompt, schema }
//!        v
//!   SplitModel::generate --> raw structured text
//!        |
//!   OllamaClient  POST <base_url>/api/chat
//!                 bounded by tokio::time::timeout
//! ```

mod ollama;

#[cfg(test)]
mod tests;

use std::future::Future;

use tracing::debug;

pub use ollama::OllamaClient;

use crate::config::types::ModelConfig;
use crate::error::ModelError;

/// Result type for model calls.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// One structured-output generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fixed instruction set.
    pub system: String,
    /// User content (the aggregate diff).
    pub prompt: String,
    /// JSON schema the answer must follow.
    pub schema: serde_json::Value,
}

/// A model that turns a request into structured text.
pub trait SplitModel {
    /// Run one request and return the model's raw answer.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] on transport failure, a non-success status,
    /// an unexpected response envelope, or a timeout.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = ModelResult<String>> + Send;
}

/// Create the model client named by `config.provider`.
///
/// # Errors
///
/// Returns [`ModelError::UnknownProvider`] for an unsupported provider and
/// [`ModelError::Transport`] if the HTTP client cannot be built.
pub fn create_model(config: &ModelConfig) -> ModelResult<OllamaClient> {
    debug!(provider = %config.provider, model = %config.name, "creating model client");
    match config.provider.as_str() {
        "ollama" => OllamaClient::from_config(config),
        other => Err(ModelError::UnknownProvider(other.to_string())),
    }
}
