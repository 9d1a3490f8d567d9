//! Graph-store access for theorem records.
//!
//! [`TheoremStore`] is the seam between the services and the database:
//! [`Neo4jTheoremStore`] talks Cypher to a live Neo4j instance, while
//! [`InMemoryTheoremStore`] keeps the same semantics in process.

pub mod errors;
pub mod graph_db;
pub mod ingest;
pub mod memory;
pub mod store;

pub use errors::{GraphError, GraphResult};
pub use graph_db::Neo4jTheoremStore;
pub use ingest::TheoremIngestor;
pub use memory::{InMemoryTheoremStore, LookupCounts};
pub use store::{GraphStatistics, TheoremStore};
