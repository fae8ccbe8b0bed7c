//! Truth-graph archive.

use cassandra_core::{plan_truth_graph, ClaimVerificationState, Status, VerdictRecord};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::GraphConfig;
use crate::graph::GraphStore;

/// Records verdicts in the graph store, if one is configured.
pub struct GraphPersister {
    store: Option<Arc<dyn GraphStore>>,
}

impl GraphPersister {
    /// The store is dropped unless `config` is fully configured, so an unset
    /// or placeholder password never reaches the database.
    pub fn new(store: Arc<dyn GraphStore>, config: &GraphConfig) -> Self {
        Self {
            store: config.is_configured().then_some(store),
        }
    }

    /// A persister that never writes.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Archive the verdict and return the terminal status.
    ///
    /// `contradiction_found` is only read, never changed.
    pub async fn persist(&self, state: &ClaimVerificationState) -> Status {
        let record = VerdictRecord::from_state(state);

        let Some(store) = &self.store else {
            warn!(
                verdict = %record.verdict(),
                "Graph store not configured, skipping database update \
                 (set NEO4J_URI, NEO4J_USERNAME and NEO4J_PASSWORD to enable)"
            );
            return Status::SkippedDb;
        };

        let plan = plan_truth_graph(&record);
        match store.execute_write(&plan).await {
            Ok(()) => {
                let status = record.verdict().status();
                info!(store = store.name(), status = %status, "Truth graph updated");
                status
            }
            Err(e) => {
                error!(store = store.name(), error = %e, "Truth graph update failed");
                Status::Error
            }
        }
    }
}
