use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use theograph_graph::GraphError;
use thiserror::Error;

use crate::llm::LlmError;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Theorem not found: {0}")]
    NotFound(String),

    #[error("Graph database is not connected")]
    GraphUnavailable,

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),
}

impl RagError {
    fn error_kind(&self) -> &'static str {
        match self {
            RagError::InvalidRequest(_) => "invalid_request",
            RagError::NotFound(_) => "not_found",
            RagError::GraphUnavailable => "graph_unavailable",
            RagError::Graph(_) => "graph_error",
            RagError::Llm(_) => "llm_error",
        }
    }
}

impl ResponseError for RagError {
    fn status_code(&self) -> StatusCode {
        match self {
            RagError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RagError::NotFound(_) => StatusCode::NOT_FOUND,
            RagError::GraphUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            RagError::Graph(GraphError::Validation(_)) => StatusCode::BAD_REQUEST,
            RagError::Graph(GraphError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            RagError::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RagError::Llm(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.error_kind(),
            "details": self.to_string()
        }))
    }
}

pub type RagResult<T> = Result<T, RagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RagError::InvalidRequest("blank".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RagError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(RagError::GraphUnavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            RagError::Graph(GraphError::Neo4j("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RagError::Llm(LlmError::NoResponse).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
