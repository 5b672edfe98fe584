use crate::config::LlmConfig;
use crate::error::AppError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Single-method capability over the hosted model so the vendor can be
/// swapped (or stubbed in tests) without touching the request pipeline.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AppError>;
}

/// OpenAI-compatible chat-completion client. One completion per call,
/// fixed model and temperature from configuration, no streaming.
pub struct LlmClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .with_context(|| format!("Failed to build HTTP client for {}", config.api_base))?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));

        let request_body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "stream": false,
        });

        debug!(model = %self.model, "Calling completion API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Completion(format!("transport error calling {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Completion(format!(
                "provider returned status {}: {}",
                status, error_text
            )));
        }

        let v: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Completion(format!("invalid JSON from provider: {}", e)))?;

        if let Some(err_msg) = detect_provider_error(&v) {
            return Err(AppError::Completion(format!(
                "provider reported error: {}",
                err_msg
            )));
        }

        match extract_completion_text(&v) {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AppError::Completion(format!(
                "response missing completion text: {}",
                v
            ))),
        }
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AppError> {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user.to_string(),
            },
        ];

        self.chat_completion(messages).await
    }
}

/// Pulls the completion text out of the provider response, tolerating the
/// shapes seen across OpenAI-compatible providers.
fn extract_completion_text(v: &serde_json::Value) -> Option<String> {
    let first_choice = v.get("choices").and_then(|c| c.get(0));

    // choices[0].message.content as a plain string
    if let Some(s) = first_choice
        .and_then(|c0| c0.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
    {
        return Some(s.to_string());
    }

    // Some providers return content as an array of parts
    if let Some(parts) = first_choice
        .and_then(|c0| c0.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_array())
    {
        let mut out = String::new();
        for p in parts {
            if let Some(s) = p.as_str() {
                out.push_str(s);
            } else if let Some(t) = p.get("text").and_then(|t| t.as_str()) {
                out.push_str(t);
            }
        }
        if !out.is_empty() {
            return Some(out);
        }
    }

    // Legacy completions shape: choices[0].text
    if let Some(s) = first_choice
        .and_then(|c0| c0.get("text"))
        .and_then(|t| t.as_str())
    {
        return Some(s.to_string());
    }

    None
}

/// Some providers put errors in a 200 body instead of an error status.
fn detect_provider_error(value: &serde_json::Value) -> Option<String> {
    let error_val = value.get("error")?;

    if let Some(obj) = error_val.as_object() {
        let message = ["message", "msg", "detail"]
            .iter()
            .filter_map(|key| obj.get(*key))
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty());
        let code = ["code", "type"]
            .iter()
            .filter_map(|key| obj.get(*key))
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty());
        return match (code, message) {
            (Some(code), Some(msg)) => Some(format!("{}: {}", code, msg)),
            (None, Some(msg)) => Some(msg),
            _ => Some(error_val.to_string()),
        };
    }

    if let Some(text) = error_val.as_str() {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    None
}
