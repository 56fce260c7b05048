use crate::config::Config;
use anyhow::Context;
use domain::provider::CompletionModel;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::sync::Arc;
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Message,
    #[serde(default)]
    done: bool,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Arc<Client>,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ollama_base_url.clone(), config.ollama_model.clone())
    }

    pub async fn generate_response(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };
        debug!("Calling Ollama (model: {})", self.model);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed contacting Ollama")?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("Ollama API error ({status}): {text}"));
        }
        Ok(collect_chat_content(&text))
    }
}

/// Joins message content from a chat body, whether a single JSON object or
/// NDJSON chunks ending in `"done": true`.
fn collect_chat_content(body: &str) -> String {
    let mut full_content = String::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(chat_resp) = serde_json::from_str::<ChatResponse>(line) {
            full_content.push_str(&chat_resp.message.content);
            if chat_resp.done {
                break;
            }
        }
    }
    if full_content.is_empty() {
        if let Ok(chat_resp) = serde_json::from_str::<ChatResponse>(body) {
            full_content = chat_resp.message.content;
        }
    }
    full_content.trim().to_string()
}

impl CompletionModel for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.generate_response(prompt).await
    }
}
