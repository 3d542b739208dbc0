use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use url::Url;

/// Optional context enrichment: background text about a topic.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    async fn lookup(&self, topic: &str) -> Result<Option<String>>;
}

#[derive(Clone)]
pub struct WikipediaService {
    client: Client,
    api_url: String,
}

impl WikipediaService {
    pub fn new(api_url: String, client: Client) -> Self {
        Self { client, api_url }
    }
}

#[async_trait]
impl ReferenceLookup for WikipediaService {
    async fn lookup(&self, topic: &str) -> Result<Option<String>> {
        let url = Url::parse_with_params(
            &self.api_url,
            &[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("titles", topic),
                ("origin", "*"),
            ],
        )
        .map_err(|e| Error::Config(format!("Invalid Wikipedia API URL: {}", e)))?;

        let res = self.client.get(url).send().await?;
        if !res.status().is_success() {
            return Err(Error::Upstream(format!(
                "Wikipedia API returned {}",
                res.status()
            )));
        }
        let body: JsonValue = res.json().await?;
        Ok(first_extract(&body))
    }
}

fn first_extract(body: &JsonValue) -> Option<String> {
    body.get("query")
        .and_then(|q| q.get("pages"))
        .and_then(|p| p.as_object())?
        .values()
        .filter_map(|page| page.get("extract").and_then(|e| e.as_str()))
        .map(str::trim)
        .find(|extract| !extract.is_empty())
        .map(str::to_string)
}

/// Looks up context for a topic; any failure means "no context".
pub async fn reference_context(lookup: &dyn ReferenceLookup, topic: &str) -> Option<String> {
    match lookup.lookup(topic).await {
        Ok(Some(text)) => Some(text),
        Ok(None) => {
            tracing::info!(topic, "No reference text found, proceeding without context");
            None
        }
        Err(e) => {
            tracing::warn!(topic, error = %e, "Reference lookup failed, proceeding without context");
            None
        }
    }
}
