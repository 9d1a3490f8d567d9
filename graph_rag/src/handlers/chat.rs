use actix_web::{web, HttpResponse};
use theograph_models::ChatRequest;

use crate::errors::RagResult;
use crate::state::AppState;

pub async fn chat(
    state: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> RagResult<HttpResponse> {
    let response = state.chat.respond(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Forget a conversation's history. Unknown ids are not an error.
pub async fn reset_conversation(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> RagResult<HttpResponse> {
    let conversation_id = path.into_inner();
    if state.chat.conversations().reset(&conversation_id) {
        tracing::info!(conversation_id = %conversation_id, "Conversation reset");
    }
    Ok(HttpResponse::NoContent().finish())
}
