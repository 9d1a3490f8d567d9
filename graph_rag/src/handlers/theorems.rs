use actix_web::{web, HttpResponse};
use theograph_models::IngestRequest;

use crate::errors::{RagError, RagResult};
use crate::state::AppState;

/// Ingest a batch of theorems. Per-record failures are reported in the body,
/// not as an error status.
pub async fn ingest_theorems(
    state: web::Data<AppState>,
    req: web::Json<IngestRequest>,
) -> RagResult<HttpResponse> {
    let ingestor = state.ingestor()?;
    let request = req.into_inner();

    let report = ingestor.ingest_batch(request.theorems).await;
    tracing::info!(
        total = report.total,
        added = report.added,
        failed = report.failed,
        "Theorem batch ingested"
    );

    Ok(HttpResponse::Ok().json(report))
}

pub async fn get_theorem(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> RagResult<HttpResponse> {
    let name = path.into_inner();

    match state.chat.retriever().retrieve_one(&name).await? {
        Some(theorem) => Ok(HttpResponse::Ok().json(theorem)),
        None => Err(RagError::NotFound(name)),
    }
}
