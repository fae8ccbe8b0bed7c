//! Mock collaborators for tests.

use async_trait::async_trait;
use cassandra_core::CypherStatement;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::graph::{GraphError, GraphStore};
use crate::providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use crate::search::{SearchError, SearchHit, SearchProvider, SearchRequest};

/// Provider that replays scripted replies in order.
///
/// The last reply repeats once the script runs out. `Err` entries become
/// `ProviderError::HttpError`.
pub struct ScriptedProvider {
    replies: Vec<Result<String, String>>,
    usage: TokenUsage,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies,
            usage: TokenUsage::default(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(message.to_string())])
    }

    pub fn with_usage(mut self, prompt_tokens: u32, completion_tokens: u32) -> Self {
        self.usage = TokenUsage {
            prompt_tokens,
            completion_tokens,
        };
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User-message text of every call so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().extend(
            messages
                .into_iter()
                .filter(|m| m.role == "user")
                .map(|m| m.content),
        );

        let reply = self
            .replies
            .get(n)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or_else(|| Ok(String::new()));

        match reply {
            Ok(content) => Ok(CompletionResponse {
                content,
                usage: self.usage,
                model: config.model.clone(),
                stop_reason: Some("STOP".to_string()),
            }),
            Err(message) => Err(ProviderError::HttpError(message)),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Search provider with a fixed answer.
pub struct StaticSearch {
    result: Result<Vec<SearchHit>, String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<SearchRequest>>,
}

impl StaticSearch {
    pub fn hits(hits: Vec<SearchHit>) -> Self {
        Self {
            result: Ok(hits),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `n` hits with urls `https://source{i}.example`.
    pub fn numbered(n: usize) -> Self {
        Self::hits(
            (1..=n)
                .map(|i| {
                    SearchHit::new(
                        format!("https://source{}.example", i),
                        format!("content {}", i),
                    )
                })
                .collect(),
        )
    }

    /// Fails every query with a connection error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        match &self.result {
            Ok(hits) => Ok(hits.clone()),
            Err(message) => Err(SearchError::HttpError(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Graph store that records plans instead of executing them.
#[derive(Default)]
pub struct RecordingGraph {
    fail_with: Option<String>,
    calls: AtomicUsize,
    pings: AtomicUsize,
    plans: Mutex<Vec<Vec<CypherStatement>>>,
}

impl RecordingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn pings(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }

    pub fn plans(&self) -> Vec<Vec<CypherStatement>> {
        self.plans.lock().clone()
    }
}

#[async_trait]
impl GraphStore for RecordingGraph {
    async fn execute_write(&self, plan: &[CypherStatement]) -> Result<(), GraphError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(GraphError::Connection(message.clone()));
        }
        self.plans.lock().push(plan.to_vec());
        Ok(())
    }

    async fn ping(&self) -> Result<(), GraphError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(GraphError::Connection(message.clone())),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}
