//! Web search collaborators.
//!
//! The research stage only needs an ordered list of `{url, content}` hits.
//! Providers must preserve their relevance order.

use async_trait::async_trait;
use cassandra_core::defaults::MAX_SOURCES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "tavily")]
mod tavily;

#[cfg(feature = "tavily")]
pub use tavily::TavilySearch;

/// Errors from search providers.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    HttpError(String),

    #[error("Search API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Search authentication failed")]
    AuthError,

    #[error("Search quota exceeded")]
    QuotaExceeded,

    #[error("Search timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to parse search response: {0}")]
    ParseError(String),

    #[error("Search provider not configured: {0}")]
    NotConfigured(String),
}

/// How much effort the provider spends per query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub depth: SearchDepth,
    pub max_results: usize,
}

impl SearchRequest {
    /// Deep search capped at [`MAX_SOURCES`] results.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            depth: SearchDepth::Advanced,
            max_results: MAX_SOURCES,
        }
    }

    pub fn depth(mut self, depth: SearchDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Never more than [`MAX_SOURCES`], never zero.
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.clamp(1, MAX_SOURCES);
        self
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: Option<f64>,
}

impl SearchHit {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            content: content.into(),
            score: None,
        }
    }
}

/// Search abstraction allows swapping web search backends.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a query, returning hits in relevance order.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError>;

    /// Get provider name for logs.
    fn name(&self) -> &str;
}

/// Search provider used when no search key is configured.
///
/// Every query fails, so the research stage reports the missing key in the
/// hypothesis instead of silently returning nothing.
#[derive(Debug, Default)]
pub struct UnconfiguredSearch;

#[async_trait]
impl SearchProvider for UnconfiguredSearch {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        Err(SearchError::NotConfigured(
            "set TAVILY_API_KEY or search.api_key".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}
