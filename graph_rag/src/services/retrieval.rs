use std::sync::Arc;
use theograph_graph::TheoremStore;
use theograph_models::{RetrievedTheorem, TheoremRecord};
use tracing::debug;

use crate::errors::{RagError, RagResult};

/// Fetches named theorems and their direct dependencies from the graph.
#[derive(Clone)]
pub struct TheoremRetriever {
    store: Option<Arc<dyn TheoremStore>>,
}

impl TheoremRetriever {
    pub fn new(store: Option<Arc<dyn TheoremStore>>) -> Self {
        Self { store }
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> RagResult<&Arc<dyn TheoremStore>> {
        self.store.as_ref().ok_or(RagError::GraphUnavailable)
    }

    /// Retrieve candidates in the order given. Names with no node are skipped.
    pub async fn retrieve(&self, names: &[String]) -> RagResult<Vec<RetrievedTheorem>> {
        let mut retrieved = Vec::with_capacity(names.len());

        for name in names {
            match self.retrieve_one(name).await? {
                Some(theorem) => retrieved.push(theorem),
                None => debug!(name = %name.trim(), "theorem not in graph, skipping"),
            }
        }

        Ok(retrieved)
    }

    /// One theorem with its direct dependencies, or `None` if it is unknown.
    pub async fn retrieve_one(&self, name: &str) -> RagResult<Option<RetrievedTheorem>> {
        let store = self.store()?;
        let name = name.trim();

        let Some(theorem) = store.get_theorem(name).await? else {
            return Ok(None);
        };

        let dep_names = store.get_dependencies(name).await?;
        let mut dependencies = Vec::with_capacity(dep_names.len());
        for dep_name in dep_names {
            // the edge guarantees a node, but it may have been removed out of band
            let record = store
                .get_theorem(&dep_name)
                .await?
                .unwrap_or_else(|| TheoremRecord::stub(dep_name));
            dependencies.push(record);
        }

        Ok(Some(RetrievedTheorem { theorem, dependencies }))
    }
}
