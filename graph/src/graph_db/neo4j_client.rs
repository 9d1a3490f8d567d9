use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Query};
use std::sync::Arc;
use theograph_config::Neo4jConfig;
use theograph_models::{Theorem, TheoremRecord};

use super::queries;
use crate::errors::{GraphError, GraphResult};
use crate::store::{GraphStatistics, TheoremStore};

/// Theorem store backed by Neo4j, local or AuraDB.
pub struct Neo4jTheoremStore {
    graph: Arc<Graph>,
}

impl Neo4jTheoremStore {
    /// Connect and verify the connection with a trivial query.
    ///
    /// `uri` may be `bolt://localhost:7687` for a local instance or
    /// `neo4j+s://xxxxx.databases.neo4j.io` for AuraDB.
    pub async fn connect(config: &Neo4jConfig) -> GraphResult<Self> {
        tracing::info!("🔷 Connecting to Neo4j at: {}", config.uri);

        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .fetch_size(500)
            .max_connections(10)
            .build()
            .map_err(|e| GraphError::Neo4j(format!("Failed to build Neo4j config: {}", e)))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| GraphError::Neo4j(format!("Failed to connect to Neo4j: {}", e)))?;

        let mut result = graph
            .execute(query("RETURN 1 as test"))
            .await
            .map_err(|e| GraphError::Neo4j(format!("Connection test failed: {}", e)))?;

        if result.next().await?.is_some() {
            tracing::info!("✅ Neo4j connection established successfully");
        }

        Ok(Self {
            graph: Arc::new(graph),
        })
    }

    fn upsert_queries(theorem: &Theorem) -> Vec<Query> {
        let mut batch = Vec::with_capacity(1 + theorem.dependencies.len());

        batch.push(
            query(queries::UPSERT_THEOREM)
                .param("name", theorem.name.as_str())
                .param("statement", theorem.statement.as_str())
                .param("proof", theorem.proof.as_str())
                .param("type", theorem.kind.as_str())
                .param("subject", theorem.subject.as_str())
                .param("domain", theorem.domain.as_str()),
        );

        for dep_name in &theorem.dependencies {
            batch.push(
                query(queries::LINK_DEPENDENCY)
                    .param("theorem_name", theorem.name.as_str())
                    .param("dep_name", dep_name.as_str()),
            );
        }

        batch
    }
}

#[async_trait]
impl TheoremStore for Neo4jTheoremStore {
    async fn initialize(&self) -> GraphResult<()> {
        for constraint in queries::CONSTRAINTS {
            self.graph.run(query(constraint)).await?;
        }
        tracing::info!("Graph schema constraints ensured");
        Ok(())
    }

    async fn upsert_theorem(&self, theorem: &Theorem) -> GraphResult<()> {
        let mut txn = self.graph.start_txn().await?;

        if let Err(e) = txn.run_queries(Self::upsert_queries(theorem)).await {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(
                    "Rollback after failed upsert of {} also failed: {}",
                    theorem.name,
                    rollback_err
                );
            }
            return Err(e.into());
        }

        txn.commit().await?;
        Ok(())
    }

    async fn get_theorem(&self, name: &str) -> GraphResult<Option<TheoremRecord>> {
        let mut result = self
            .graph
            .execute(query(queries::GET_THEOREM).param("name", name.trim()))
            .await?;

        match result.next().await? {
            Some(row) => Ok(Some(TheoremRecord {
                name: row.get("name")?,
                statement: row.get("statement")?,
                proof: row.get("proof")?,
                kind: row.get("type")?,
            })),
            None => Ok(None),
        }
    }

    async fn get_dependencies(&self, name: &str) -> GraphResult<Vec<String>> {
        let mut result = self
            .graph
            .execute(query(queries::GET_DEPENDENCIES).param("name", name.trim()))
            .await?;

        let mut dependencies = Vec::new();
        while let Some(row) = result.next().await? {
            dependencies.push(row.get::<String>("dependency")?);
        }

        Ok(dependencies)
    }

    async fn statistics(&self) -> GraphResult<GraphStatistics> {
        let mut result = self.graph.execute(query(queries::STATISTICS)).await?;

        match result.next().await? {
            Some(row) => Ok(GraphStatistics {
                theorems: row.get("theorems")?,
                subjects: row.get("subjects")?,
                domains: row.get("domains")?,
                dependencies: row.get("dependencies")?,
            }),
            None => Ok(GraphStatistics::default()),
        }
    }
}

/// These need a running Neo4j (NEO4J_URI etc. in the environment) and write
/// to it, so they are ignored by default.
#[cfg(test)]
mod tests {
    use super::*;
    use theograph_config::AppConfig;

    async fn connect() -> Neo4jTheoremStore {
        let config = AppConfig::from_env().expect("valid test configuration");
        let store = Neo4jTheoremStore::connect(&config.neo4j)
            .await
            .expect("Failed to connect to test Neo4j");
        store.initialize().await.expect("Failed to create constraints");
        store
    }

    #[tokio::test]
    #[ignore] // Requires running Neo4j
    async fn test_reingest_updates_in_place() {
        let store = connect().await;
        let name = "it::Cauchy-Schwarz Inequality";

        let first = Theorem::new(name, "first statement", "Analysis", "Inner Product Spaces");
        store.upsert_theorem(&first).await.unwrap();
        let before = store.statistics().await.unwrap();

        let second = Theorem::new(name, "second statement", "Analysis", "Inner Product Spaces");
        store.upsert_theorem(&second).await.unwrap();
        let after = store.statistics().await.unwrap();

        let record = store.get_theorem(name).await.unwrap().unwrap();
        assert_eq!(record.statement.as_deref(), Some("second statement"));
        assert_eq!(before.theorems, after.theorems);
    }

    #[tokio::test]
    #[ignore] // Requires running Neo4j
    async fn test_dependencies_sorted_and_stubbed() {
        let store = connect().await;

        let theorem = Theorem::new("it::Main Result", "s", "Algebra", "Linear Algebra")
            .with_dependencies(["it::Z-Lemma", "it::A-Lemma"]);
        store.upsert_theorem(&theorem).await.unwrap();

        let deps = store.get_dependencies("it::Main Result").await.unwrap();
        assert_eq!(deps, vec!["it::A-Lemma", "it::Z-Lemma"]);

        let stub = store.get_theorem("it::A-Lemma").await.unwrap().unwrap();
        assert!(stub.is_stub());
    }
}
