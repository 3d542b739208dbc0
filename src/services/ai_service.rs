use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// The text-generation collaborator: one prompt in, raw model text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AIService {
    pub fn new(api_key: String, model: String, base_url: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextGenerator for AIService {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let payload = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        tracing::info!(model = %self.model, prompt_len = prompt.len(), "Sending request to Gemini");
        let res = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("Gemini API Error {}: {}", status, text)));
        }

        let body: JsonValue = res.json().await.map_err(transport_error)?;
        candidate_text(&body)
            .ok_or_else(|| Error::Upstream("Invalid Gemini response format".to_string()))
    }
}

/// Request URLs never reach error text: they end up in responses and logs.
fn transport_error(err: reqwest::Error) -> Error {
    Error::Upstream(format!("Gemini request failed: {}", err.without_url()))
}

fn candidate_text(body: &JsonValue) -> Option<String> {
    let parts = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
