pub mod neo4j_client;
pub mod queries;

pub use neo4j_client::Neo4jTheoremStore;
