//! Neo4j graph store.

use async_trait::async_trait;
use cassandra_core::CypherStatement;
use neo4rs::{query, ConfigBuilder, Graph};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::{GraphError, GraphStore};
use crate::config::GraphConfig;
use crate::providers::ApiCredential;

const PING_QUERY: &str = "RETURN 1";

/// Neo4j store over the Bolt protocol.
///
/// The connection pool is opened on first use and reused afterwards.
pub struct Neo4jStore {
    uri: String,
    user: String,
    password: ApiCredential,
    graph: OnceCell<Graph>,
}

impl std::fmt::Debug for Neo4jStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jStore")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &self.password)
            .finish()
    }
}

impl Neo4jStore {
    pub fn new(uri: impl Into<String>, user: impl Into<String>, password: ApiCredential) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password,
            graph: OnceCell::new(),
        }
    }

    /// Build a store from configuration.
    ///
    /// Fails when the graph is not configured; callers check
    /// [`GraphConfig::is_configured`] first.
    pub fn from_config(config: &GraphConfig) -> Result<Self, GraphError> {
        if !config.is_configured() {
            return Err(GraphError::NotConfigured(
                "set NEO4J_URI and NEO4J_PASSWORD".to_string(),
            ));
        }
        match (&config.uri, &config.password) {
            (Some(uri), Some(password)) => {
                Ok(Self::new(uri.clone(), config.user.clone(), password.clone()))
            }
            _ => Err(GraphError::NotConfigured(
                "set NEO4J_URI and NEO4J_PASSWORD".to_string(),
            )),
        }
    }

    async fn graph(&self) -> Result<&Graph, GraphError> {
        self.graph
            .get_or_try_init(|| async {
                let config = ConfigBuilder::default()
                    .uri(self.uri.as_str())
                    .user(self.user.as_str())
                    .password(self.password.expose())
                    .max_connections(4)
                    .build()
                    .map_err(|e| GraphError::Connection(e.to_string()))?;
                info!(uri = %self.uri, "Connecting to Neo4j");
                Graph::connect(config)
                    .await
                    .map_err(|e| GraphError::Connection(e.to_string()))
            })
            .await
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn execute_write(&self, plan: &[CypherStatement]) -> Result<(), GraphError> {
        let graph = self.graph().await?;
        let mut txn = graph
            .start_txn()
            .await
            .map_err(|e| GraphError::Transaction(e.to_string()))?;

        for statement in plan {
            let q = statement
                .params
                .iter()
                .fold(query(&statement.text), |q, (key, value)| {
                    q.param(key.as_str(), value.as_str())
                });
            debug!(params = statement.params.len(), "Running graph statement");
            txn.run(q)
                .await
                .map_err(|e| GraphError::Query(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| GraphError::Transaction(e.to_string()))?;

        info!(statements = plan.len(), "Graph transaction committed");
        Ok(())
    }

    async fn ping(&self) -> Result<(), GraphError> {
        self.graph()
            .await?
            .run(query(PING_QUERY))
            .await
            .map_err(|e| GraphError::Query(e.to_string()))
    }

    fn name(&self) -> &str {
        "neo4j"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::CredentialSource;

    fn password(value: &str) -> ApiCredential {
        ApiCredential::new(value, CredentialSource::Programmatic, "Neo4j password")
    }

    #[test]
    fn test_password_not_in_debug_output() {
        let store = Neo4jStore::new("bolt://localhost:7687", "neo4j", password("graph-secret-1"));
        let debug = format!("{:?}", store);
        assert!(!debug.contains("graph-secret-1"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_from_config_requires_configuration() {
        let config = GraphConfig::default();
        assert!(matches!(
            Neo4jStore::from_config(&config),
            Err(GraphError::NotConfigured(_))
        ));

        let config = GraphConfig {
            uri: Some("bolt://localhost:7687".to_string()),
            password: Some(password("xxxx")),
            ..GraphConfig::default()
        };
        assert!(Neo4jStore::from_config(&config).is_err());

        let config = GraphConfig {
            uri: Some("bolt://localhost:7687".to_string()),
            password: Some(password("real")),
            ..GraphConfig::default()
        };
        let store = Neo4jStore::from_config(&config).unwrap();
        assert_eq!(store.name(), "neo4j");
        assert_eq!(store.user, "neo4j");
    }
}
