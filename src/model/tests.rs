// pr-splitter: split a branch into logical commits
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::ollama::parse_chat_response;
use super::{GenerationRequest, OllamaClient, create_model};
use crate::config::types::ModelConfig;
use crate::error::ModelError;

fn request() -> GenerationRequest {
    GenerationRequest {
        system: "split it".to_string(),
        prompt: "diff --git a/x b/x".to_string(),
        schema: serde_json::json!({ "type": "object" }),
    }
}

#[test]
fn test_create_model_rejects_unknown_provider() {
    let config = ModelConfig {
        provider: "openai".to_string(),
        ..ModelConfig::default()
    };
    let err = create_model(&config).unwrap_err();
    assert!(matches!(err, ModelError::UnknownProvider(p) if p == "openai"));
}

#[test]
fn test_endpoint_trims_trailing_slash() {
    let config = ModelConfig {
        base_url: "http://models.internal:11434/".to_string(),
        ..ModelConfig::default()
    };
    let client = OllamaClient::from_config(&config).unwrap();
    assert_eq!(client.endpoint(), "http://models.internal:11434/api/chat");
}

#[test]
fn test_request_body() {
    let client = OllamaClient::from_config(&ModelConfig::default()).unwrap();
    let body = client.build_request_body(&request());

    assert_eq!(body["model"], "llama3.1");
    assert_eq!(body["stream"], false);
    assert_eq!(body["format"], serde_json::json!({ "type": "object" }));
    assert_eq!(body["options"]["temperature"], 0.0);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "split it");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "diff --git a/x b/x");
}

#[test]
fn test_parse_chat_response() {
    let text = r#"{"model":"llama3.1","message":{"role":"assistant","content":"{\"commits\":[]}"},"done":true}"#;
    assert_eq!(parse_chat_response(text).unwrap(), r#"{"commits":[]}"#);
}

#[test]
fn test_parse_chat_response_errors() {
    for text in [
        "not json",
        r#"{"done":true}"#,
        r#"{"error":"model 'x' not found"}"#,
    ] {
        let err = parse_chat_response(text).unwrap_err();
        assert!(
            matches!(err, ModelError::MalformedResponse(_)),
            "{text}: {err:?}"
        );
    }
}
