use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use theograph_models::{Theorem, TheoremRecord};

use crate::errors::GraphResult;

/// Storage operations over the theorem graph.
///
/// Node labels are `Theorem`, `Subject` and `Domain`; relationships are
/// `DEPENDS_ON`, `BELONGS_TO_SUBJECT`, `BELONGS_TO_DOMAIN` and `PART_OF_SUBJECT`.
/// Nothing is ever deleted.
#[async_trait]
pub trait TheoremStore: Send + Sync {
    /// Create uniqueness constraints. Idempotent.
    async fn initialize(&self) -> GraphResult<()>;

    /// Merge a theorem by name together with its subject, domain and
    /// dependency edges as one atomic unit.
    ///
    /// Missing dependency targets are created as stub nodes carrying only a
    /// name. The caller is expected to pass a normalized, validated record.
    async fn upsert_theorem(&self, theorem: &Theorem) -> GraphResult<()>;

    /// Exact, case-sensitive lookup on the trimmed name.
    async fn get_theorem(&self, name: &str) -> GraphResult<Option<TheoremRecord>>;

    /// Names of direct `DEPENDS_ON` targets, sorted lexicographically.
    async fn get_dependencies(&self, name: &str) -> GraphResult<Vec<String>>;

    async fn statistics(&self) -> GraphResult<GraphStatistics>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub theorems: i64,
    pub subjects: i64,
    pub domains: i64,
    pub dependencies: i64,
}
