use std::sync::Arc;
use theograph_models::{IngestReport, Theorem};
use tracing::{info, warn};

use crate::errors::{GraphError, GraphResult};
use crate::store::TheoremStore;

/// Writes theorem records into a [`TheoremStore`].
#[derive(Clone)]
pub struct TheoremIngestor {
    store: Arc<dyn TheoremStore>,
}

impl TheoremIngestor {
    pub fn new(store: Arc<dyn TheoremStore>) -> Self {
        Self { store }
    }

    /// Normalize, validate and upsert one theorem, returning its stored name.
    pub async fn ingest(&self, theorem: Theorem) -> GraphResult<String> {
        let theorem = theorem
            .into_validated()
            .map_err(|e| GraphError::Validation(e.to_string()))?;

        self.store.upsert_theorem(&theorem).await?;
        Ok(theorem.name)
    }

    /// Boolean form of [`ingest`](Self::ingest): failures are logged, not returned.
    pub async fn add_theorem(&self, theorem: Theorem) -> bool {
        let name = theorem.name.clone();
        match self.ingest(theorem).await {
            Ok(name) => {
                info!("Added: {}", name);
                true
            }
            Err(e) => {
                warn!("Failed to add {}: {}", name, e);
                false
            }
        }
    }

    /// Ingest records in input order, continuing past failures.
    pub async fn ingest_batch(&self, theorems: Vec<Theorem>) -> IngestReport {
        let mut report = IngestReport::default();

        for theorem in theorems {
            let name = theorem.name.clone();
            match self.ingest(theorem).await {
                Ok(name) => {
                    info!("Added: {}", name);
                    report.record_success();
                }
                Err(e) => {
                    warn!("Failed to add {}: {}", name, e);
                    report.record_failure(name, e.to_string());
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryTheoremStore;
    use theograph_models::TheoremKind;

    fn ingestor() -> (Arc<InMemoryTheoremStore>, TheoremIngestor) {
        let store = Arc::new(InMemoryTheoremStore::new());
        (store.clone(), TheoremIngestor::new(store))
    }

    #[tokio::test]
    async fn test_add_theorem_normalizes_before_writing() {
        let (store, ingestor) = ingestor();

        let theorem = Theorem::new(" Bezout's Identity ", "gcd(a, b) = ax + by", "Algebra", "Number Theory")
            .with_kind(TheoremKind::Lemma)
            .with_dependencies([" Division Algorithm ", ""]);

        assert!(ingestor.add_theorem(theorem).await);

        let record = store.get_theorem("Bezout's Identity").await.unwrap().unwrap();
        assert_eq!(record.kind.as_deref(), Some("Lemma"));
        assert_eq!(
            store.get_dependencies("Bezout's Identity").await.unwrap(),
            vec!["Division Algorithm"]
        );
    }

    #[tokio::test]
    async fn test_invalid_theorem_returns_false_and_writes_nothing() {
        let (store, ingestor) = ingestor();

        let theorem = Theorem::new("Empty", "   ", "Algebra", "Number Theory");
        assert!(!ingestor.add_theorem(theorem).await);
        assert_eq!(store.statistics().await.unwrap().theorems, 0);
    }

    #[tokio::test]
    async fn test_batch_report() {
        let (store, ingestor) = ingestor();

        let report = ingestor
            .ingest_batch(vec![
                Theorem::new("A", "a", "Algebra", "Group Theory"),
                Theorem::new("", "b", "Algebra", "Group Theory"),
                Theorem::new("C", "c", "Algebra", "Group Theory").with_dependencies(["A"]),
            ])
            .await;

        assert_eq!(report.total, 3);
        assert_eq!(report.added, 2);
        assert_eq!(report.failed, 1);
        assert!(report.failures[0].error.contains("name"));
        assert_eq!(store.statistics().await.unwrap().theorems, 2);
    }
}
