// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ollama chat API client.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{GenerationRequest, ModelResult, SplitModel};
use crate::config::types::ModelConfig;
use crate::error::ModelError;

/// Client for a local or remote Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    endpoint: String,
    model: String,
    temperature: f64,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl OllamaClient {
    /// Build a client from the `[model]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &ModelConfig) -> ModelResult<Self> {
        let http = Client::builder()
            .user_agent(format!("pr-splitter/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/api/chat", config.base_url.trim_end_matches('/')),
            model: config.name.clone(),
            temperature: config.temperature,
            timeout: config.timeout(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.prompt },
            ],
            "stream": false,
            "format": request.schema,
            "options": { "temperature": self.temperature },
        })
    }

    async fn send(&self, request: &GenerationRequest) -> ModelResult<String> {
        let body = self.build_request_body(request);
        debug!(endpoint = %self.endpoint, model = %self.model, prompt_bytes = request.prompt.len(), "sending generation request");

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "model endpoint returned an error");
            return Err(ModelError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_chat_response(&text)
    }
}

/// Pull `message.content` out of a non-streaming chat response.
pub(crate) fn parse_chat_response(text: &str) -> ModelResult<String> {
    let envelope: ChatResponse = serde_json::from_str(text)
        .map_err(|e| ModelError::MalformedResponse(format!("invalid JSON envelope: {e}")))?;

    if let Some(error) = envelope.error {
        return Err(ModelError::MalformedResponse(error));
    }
    envelope
        .message
        .map(|m| m.content)
        .ok_or_else(|| ModelError::MalformedResponse("response has no message".to_string()))
}

impl SplitModel for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> ModelResult<String> {
        match tokio::time::timeout(self.timeout, self.send(request)).await {
            Ok(result) => {
                let content = result?;
                debug!(bytes = content.len(), "model answered");
                Ok(content)
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "model request timed out");
                Err(ModelError::Timeout(self.timeout))
            }
        }
    }
}
