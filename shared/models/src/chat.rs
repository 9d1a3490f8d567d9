use serde::{Deserialize, Serialize};

use crate::theorem::{RetrievedTheorem, Theorem};

pub const DEFAULT_CONVERSATION_ID: &str = "default";

fn default_conversation_id() -> String {
    DEFAULT_CONVERSATION_ID.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_conversation_id")]
    pub conversation_id: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, conversation_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id: conversation_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
    #[serde(default)]
    pub sources: Vec<RetrievedTheorem>,
}

/// Batch of theorem records submitted over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub theorems: Vec<Theorem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IngestReport {
    pub total: usize,
    pub added: usize,
    pub failed: usize,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    pub fn record_success(&mut self) {
        self.total += 1;
        self.added += 1;
    }

    pub fn record_failure(&mut self, name: impl Into<String>, error: impl Into<String>) {
        self.total += 1;
        self.failed += 1;
        self.failures.push(IngestFailure {
            name: name.into(),
            error: error.into(),
        });
    }

    pub fn merge(&mut self, other: IngestReport) {
        self.total += other.total;
        self.added += other.added;
        self.failed += other.failed;
        self.failures.extend(other.failures);
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub graph_connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conversation_id_defaults() {
        let request: ChatRequest =
            serde_json::from_value(json!({ "message": "What is a group?" })).unwrap();
        assert_eq!(request.conversation_id, DEFAULT_CONVERSATION_ID);
    }

    #[test]
    fn test_ingest_report_counts() {
        let mut report = IngestReport::default();
        report.record_success();
        report.record_failure("Broken", "statement must not be empty");

        let mut other = IngestReport::default();
        other.record_success();
        report.merge(other);

        assert_eq!(report.total, 3);
        assert_eq!(report.added, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.is_clean());
        assert_eq!(report.failures[0].name, "Broken");
    }
}
