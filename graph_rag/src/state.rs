use std::sync::Arc;
use theograph_graph::{TheoremIngestor, TheoremStore};

use crate::errors::{RagError, RagResult};
use crate::services::ChatService;

/// Shared handler state, cloned into every actix worker.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub store: Option<Arc<dyn TheoremStore>>,
    pub service_name: String,
}

impl AppState {
    pub fn new(
        chat: Arc<ChatService>,
        store: Option<Arc<dyn TheoremStore>>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            chat,
            store,
            service_name: service_name.into(),
        }
    }

    pub fn graph_connected(&self) -> bool {
        self.store.is_some()
    }

    pub fn ingestor(&self) -> RagResult<TheoremIngestor> {
        self.store
            .clone()
            .map(TheoremIngestor::new)
            .ok_or(RagError::GraphUnavailable)
    }
}
