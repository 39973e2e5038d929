use reqwest::Client;
use serde::Deserialize;
use anyhow::{Result, anyhow};

/// Most results embedded into a follow-up prompt.
pub const MAX_RESULTS: usize = 3;

/// One web search hit. Ephemeral: formatted into the follow-up prompt and
/// never stored.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

#[derive(Deserialize)]
struct SearxResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxResult>,
}

/// Client for a SearxNG-compatible metasearch instance (JSON API).
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Run a text search, keeping at most [`MAX_RESULTS`] hits in the
    /// provider's own ranking order.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = format!("{}/search", self.base_url);

        let response = self.client
            .get(&url)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Search request failed with status: {}", response.status()));
        }

        let searx_response: SearxResponse = response.json().await?;
        Ok(collect_results(searx_response))
    }
}

/// Map the provider response into hits, keeping at most [`MAX_RESULTS`] in
/// the provider's own order.
fn collect_results(response: SearxResponse) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = response
        .results
        .into_iter()
        .map(|r| SearchResult {
            title: r.title,
            snippet: r.content,
            url: r.url,
        })
        .collect();
    results.truncate(MAX_RESULTS);
    results
}

/// Format hits as `"{title}: {snippet} ({url})"`, one per line, keeping
/// provider order.
pub fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}: {} ({})", r.title, r.snippet, r.url))
        .collect::<Vec<_>>()
        .join("\n")
}
