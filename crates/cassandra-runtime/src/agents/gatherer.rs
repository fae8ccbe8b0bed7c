//! Evidence gathering through the search collaborator.

use std::sync::Arc;
use tracing::info;

use crate::config::SearchConfig;
use crate::search::{SearchError, SearchHit, SearchProvider};

/// What the search turned up for a claim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    /// Result URLs in relevance order
    pub sources: Vec<String>,

    /// Result contents joined by newlines, same order as `sources`
    pub context: String,
}

impl Evidence {
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        let mut sources = Vec::with_capacity(hits.len());
        let mut contents = Vec::with_capacity(hits.len());
        for hit in hits {
            sources.push(hit.url);
            contents.push(hit.content);
        }
        Self {
            sources,
            context: contents.join("\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Queries the search collaborator for a claim.
pub struct EvidenceGatherer {
    search: Arc<dyn SearchProvider>,
    settings: SearchConfig,
}

impl EvidenceGatherer {
    pub fn new(search: Arc<dyn SearchProvider>, settings: SearchConfig) -> Self {
        Self { search, settings }
    }

    /// Search for the claim, capped at the configured result count.
    pub async fn gather(&self, claim: &str) -> Result<Evidence, SearchError> {
        let request = self.settings.request(claim);
        let mut hits = self.search.search(&request).await?;
        hits.truncate(request.max_results);

        let evidence = Evidence::from_hits(hits);
        info!(
            provider = self.search.name(),
            sources = evidence.sources.len(),
            "Evidence gathered"
        );
        Ok(evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchDepth;
    use crate::testutil::StaticSearch;

    #[tokio::test]
    async fn test_gather_preserves_order_and_joins_context() {
        let search = Arc::new(StaticSearch::hits(vec![
            SearchHit::new("https://b.example", "second ranked first"),
            SearchHit::new("https://a.example", "first ranked second"),
        ]));
        let gatherer = EvidenceGatherer::new(search.clone(), SearchConfig::default());

        let evidence = gatherer.gather("claim").await.unwrap();
        assert_eq!(evidence.sources, vec!["https://b.example", "https://a.example"]);
        assert_eq!(evidence.context, "second ranked first\nfirst ranked second");

        let requests = search.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "claim");
        assert_eq!(requests[0].depth, SearchDepth::Advanced);
        assert_eq!(requests[0].max_results, 5);
    }

    #[tokio::test]
    async fn test_gather_caps_results() {
        let search = Arc::new(StaticSearch::numbered(8));
        let gatherer = EvidenceGatherer::new(search, SearchConfig::default());

        let evidence = gatherer.gather("claim").await.unwrap();
        assert_eq!(evidence.sources.len(), 5);
        assert_eq!(evidence.sources[0], "https://source1.example");
    }

    #[tokio::test]
    async fn test_gather_zero_results() {
        let gatherer = EvidenceGatherer::new(
            Arc::new(StaticSearch::hits(vec![])),
            SearchConfig::default(),
        );
        let evidence = gatherer.gather("claim").await.unwrap();
        assert!(evidence.is_empty());
        assert_eq!(evidence.context, "");
    }

    #[tokio::test]
    async fn test_gather_propagates_search_error() {
        let gatherer = EvidenceGatherer::new(
            Arc::new(StaticSearch::failing("connection refused")),
            SearchConfig::default(),
        );
        let err = gatherer.gather("claim").await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
