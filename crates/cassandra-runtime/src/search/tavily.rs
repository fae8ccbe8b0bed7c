//! Tavily web search provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use super::{SearchError, SearchHit, SearchProvider, SearchRequest};
use crate::providers::ApiCredential;

const TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Tavily search client.
pub struct TavilySearch {
    credential: ApiCredential,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for TavilySearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilySearch")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TavilySearch {
    pub fn new(credential: ApiCredential, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::HttpError(e.to_string()))?;

        Ok(Self {
            credential,
            base_url: TAVILY_BASE_URL.to_string(),
            timeout,
            client,
        })
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'static str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: Option<f64>,
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        info!(
            query = %request.query,
            depth = %request.depth,
            max_results = request.max_results,
            "Tavily search"
        );

        let body = TavilyRequest {
            query: &request.query,
            search_depth: request.depth.as_str(),
            max_results: request.max_results,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(self.credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout(self.timeout)
                } else {
                    SearchError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        match status.as_u16() {
            401 | 403 => return Err(SearchError::AuthError),
            // 432/433 are Tavily's plan and pay-as-you-go limits
            429 | 432 | 433 => return Err(SearchError::QuotaExceeded),
            _ => {}
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let data: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        let hits: Vec<SearchHit> = data
            .results
            .into_iter()
            .filter(|r| !r.url.is_empty())
            .take(request.max_results)
            .map(|r| SearchHit {
                url: r.url,
                title: r.title,
                content: r.content,
                score: r.score,
            })
            .collect();

        info!(query = %request.query, count = hits.len(), "Tavily search complete");
        Ok(hits)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
