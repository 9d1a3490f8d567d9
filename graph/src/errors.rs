use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Neo4j error: {0}")]
    Neo4j(String),

    #[error("Invalid theorem: {0}")]
    Validation(String),

    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<neo4rs::Error> for GraphError {
    fn from(err: neo4rs::Error) -> Self {
        GraphError::Neo4j(err.to_string())
    }
}

impl From<neo4rs::DeError> for GraphError {
    fn from(err: neo4rs::DeError) -> Self {
        GraphError::Neo4j(format!("row decoding failed: {}", err))
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
