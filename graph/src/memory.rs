use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use theograph_models::{Theorem, TheoremRecord};

use crate::errors::GraphResult;
use crate::store::{GraphStatistics, TheoremStore};

#[derive(Debug, Clone)]
struct TheoremNode {
    statement: Option<String>,
    proof: Option<String>,
    kind: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TheoremNode {
    fn stub(now: DateTime<Utc>) -> Self {
        Self {
            statement: None,
            proof: None,
            kind: None,
            created_at: now,
            updated_at: None,
        }
    }
}

#[derive(Debug, Default)]
struct GraphState {
    theorems: HashMap<String, TheoremNode>,
    subjects: BTreeSet<String>,
    domains: BTreeSet<String>,
    belongs_to_subject: BTreeSet<(String, String)>,
    belongs_to_domain: BTreeSet<(String, String)>,
    part_of_subject: BTreeSet<(String, String)>,
    depends_on: BTreeSet<(String, String)>,
}

/// Number of read calls served, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupCounts {
    pub theorem_lookups: usize,
    pub dependency_lookups: usize,
}

/// Process-local theorem graph with the same merge semantics as the Neo4j
/// store. Each upsert holds the write lock for its whole duration, so it is
/// applied entirely or not at all.
#[derive(Default)]
pub struct InMemoryTheoremStore {
    state: RwLock<GraphState>,
    theorem_lookups: AtomicUsize,
    dependency_lookups: AtomicUsize,
}

impl InMemoryTheoremStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_counts(&self) -> LookupCounts {
        LookupCounts {
            theorem_lookups: self.theorem_lookups.load(Ordering::SeqCst),
            dependency_lookups: self.dependency_lookups.load(Ordering::SeqCst),
        }
    }

    pub fn reset_lookup_counts(&self) {
        self.theorem_lookups.store(0, Ordering::SeqCst);
        self.dependency_lookups.store(0, Ordering::SeqCst);
    }

    /// Creation and last-update time of a theorem node, if present.
    pub fn timestamps(&self, name: &str) -> Option<(DateTime<Utc>, Option<DateTime<Utc>>)> {
        self.state
            .read()
            .theorems
            .get(name)
            .map(|node| (node.created_at, node.updated_at))
    }

    /// Subjects a theorem has been attached to.
    pub fn subjects_of(&self, name: &str) -> Vec<String> {
        self.state
            .read()
            .belongs_to_subject
            .iter()
            .filter(|(theorem, _)| theorem == name)
            .map(|(_, subject)| subject.clone())
            .collect()
    }

    /// Subjects a domain is part of.
    pub fn domain_subjects(&self, domain: &str) -> Vec<String> {
        self.state
            .read()
            .part_of_subject
            .iter()
            .filter(|(d, _)| d == domain)
            .map(|(_, subject)| subject.clone())
            .collect()
    }
}

#[async_trait]
impl TheoremStore for InMemoryTheoremStore {
    async fn initialize(&self) -> GraphResult<()> {
        Ok(())
    }

    async fn upsert_theorem(&self, theorem: &Theorem) -> GraphResult<()> {
        let now = Utc::now();
        let mut state = self.state.write();

        let node = state
            .theorems
            .entry(theorem.name.clone())
            .or_insert_with(|| TheoremNode::stub(now));
        node.statement = Some(theorem.statement.clone());
        node.proof = Some(theorem.proof.clone());
        node.kind = Some(theorem.kind.to_string());
        node.updated_at = Some(now);

        state.subjects.insert(theorem.subject.clone());
        state
            .belongs_to_subject
            .insert((theorem.name.clone(), theorem.subject.clone()));

        state.domains.insert(theorem.domain.clone());
        state
            .belongs_to_domain
            .insert((theorem.name.clone(), theorem.domain.clone()));
        state
            .part_of_subject
            .insert((theorem.domain.clone(), theorem.subject.clone()));

        for dep_name in &theorem.dependencies {
            state
                .theorems
                .entry(dep_name.clone())
                .or_insert_with(|| TheoremNode::stub(now));
            state
                .depends_on
                .insert((theorem.name.clone(), dep_name.clone()));
        }

        Ok(())
    }

    async fn get_theorem(&self, name: &str) -> GraphResult<Option<TheoremRecord>> {
        self.theorem_lookups.fetch_add(1, Ordering::SeqCst);
        let name = name.trim();

        Ok(self.state.read().theorems.get(name).map(|node| TheoremRecord {
            name: name.to_string(),
            statement: node.statement.clone(),
            proof: node.proof.clone(),
            kind: node.kind.clone(),
        }))
    }

    async fn get_dependencies(&self, name: &str) -> GraphResult<Vec<String>> {
        self.dependency_lookups.fetch_add(1, Ordering::SeqCst);
        let name = name.trim();

        // BTreeSet iteration keeps targets in lexicographic order
        Ok(self
            .state
            .read()
            .depends_on
            .iter()
            .filter(|(from, _)| from == name)
            .map(|(_, to)| to.clone())
            .collect())
    }

    async fn statistics(&self) -> GraphResult<GraphStatistics> {
        let state = self.state.read();
        Ok(GraphStatistics {
            theorems: state.theorems.len() as i64,
            subjects: state.subjects.len() as i64,
            domains: state.domains.len() as i64,
            dependencies: state.depends_on.len() as i64,
        })
    }
}
