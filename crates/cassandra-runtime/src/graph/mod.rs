//! Graph-store collaborators.
//!
//! A store only executes write plans produced by
//! [`cassandra_core::plan_truth_graph`]; it never builds Cypher itself.

use async_trait::async_trait;
use cassandra_core::CypherStatement;
use thiserror::Error;

#[cfg(feature = "neo4j")]
mod neo4j;

#[cfg(feature = "neo4j")]
pub use neo4j::Neo4jStore;

/// Errors from graph stores.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Graph connection failed: {0}")]
    Connection(String),

    #[error("Graph query failed: {0}")]
    Query(String),

    #[error("Graph transaction failed: {0}")]
    Transaction(String),

    #[error("Graph store not configured: {0}")]
    NotConfigured(String),
}

/// Store abstraction allows swapping graph databases.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run every statement of `plan`, in order, inside one write transaction.
    ///
    /// Either the whole plan commits or none of it does.
    async fn execute_write(&self, plan: &[CypherStatement]) -> Result<(), GraphError>;

    /// Run a trivial read to prove the store accepts connections.
    async fn ping(&self) -> Result<(), GraphError>;

    /// Get store name for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GraphError::Connection("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));

        let err = GraphError::NotConfigured("NEO4J_URI".to_string());
        assert!(err.to_string().contains("NEO4J_URI"));
    }
}
