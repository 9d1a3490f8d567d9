use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use theograph_config::AppConfig;
use theograph_graph::{Neo4jTheoremStore, TheoremStore};
use theograph_observability::{init_tracing, observability, TracingConfig};
use theograph_rag::llm::{LanguageModel, OllamaClient};
use theograph_rag::services::{ChatService, ConversationStore};
use theograph_rag::{configure_routes, json_config, AppState};

const SERVICE_NAME: &str = "theograph-rag";
const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // loads .env, so it runs before LOG_FORMAT and RUST_LOG are read
    let config = AppConfig::from_env()?;
    init_tracing(TracingConfig::for_service(SERVICE_NAME));

    tracing::info!("🔷 [RAG Service] Connecting to Neo4j at {}...", config.neo4j.uri);
    let store: Option<Arc<dyn TheoremStore>> = match Neo4jTheoremStore::connect(&config.neo4j).await {
        Ok(store) => {
            if let Err(e) = store.initialize().await {
                tracing::warn!("Could not ensure graph constraints: {}", e);
            }
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::error!("Failed to connect to Neo4j: {}", e);
            tracing::warn!("Theorem retrieval and ingestion will be unavailable");
            None
        }
    };

    let ollama = OllamaClient::new(&config.llm)?;
    tracing::info!(
        "🤖 [RAG Service] Using model {} at {}",
        ollama.model_name(),
        ollama.endpoint()
    );
    let model: Arc<dyn LanguageModel> = Arc::new(ollama);

    let conversations = Arc::new(ConversationStore::new(&config.conversation));
    actix_web::rt::spawn(conversations.clone().run_eviction(EVICTION_INTERVAL));

    let chat = Arc::new(ChatService::new(
        model,
        store.clone(),
        conversations,
        config.conversation.max_context_chars,
    ));
    let state = web::Data::new(AppState::new(chat, store, SERVICE_NAME));

    let allowed_origin = config.server.allowed_origin.clone();
    let bind = (config.server.host.clone(), config.server.port);
    tracing::info!("🚀 [RAG Service] Starting on {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .wrap(cors)
            .wrap(observability(SERVICE_NAME))
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
