use actix_web::{web, HttpResponse};
use theograph_models::HealthResponse;

use crate::state::AppState;

pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: state.service_name.clone(),
        graph_connected: state.graph_connected(),
    })
}
