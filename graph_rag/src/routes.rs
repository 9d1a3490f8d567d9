use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::RagError;
use crate::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat", web::post().to(handlers::chat))
        .route("/chat/{conversation_id}", web::delete().to(handlers::reset_conversation))
        .route("/theorems", web::post().to(handlers::ingest_theorems))
        .route("/theorems/{name}", web::get().to(handlers::get_theorem))
        .route("/health", web::get().to(handlers::health_check));
}

/// JSON extractor settings: malformed bodies get the same error shape as
/// every other client error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(4 * 1024 * 1024)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            RagError::InvalidRequest(err.to_string()).into()
        })
}
