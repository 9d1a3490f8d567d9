use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Clone, Debug)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origin: String,
}

/// Limits applied to what is fed back into the model on every turn.
#[derive(Clone, Debug)]
pub struct ConversationConfig {
    pub max_turns: usize,
    pub max_history_chars: usize,
    pub max_context_chars: usize,
    pub idle_ttl: Duration,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_turns: 20,
            max_history_chars: 8_000,
            max_context_chars: 12_000,
            idle_ttl: Duration::from_secs(3600),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub neo4j: Neo4jConfig,
    pub llm: LlmConfig,
    pub conversation: ConversationConfig,
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first.
    pub fn from_env() -> ConfigResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let defaults = ConversationConfig::default();

        // Github_URL is the legacy name for the web origin
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let (origin_key, allowed_origin) = ["ALLOWED_ORIGIN", "Github_URL"]
            .into_iter()
            .find_map(|key| non_blank(key).map(|v| (key, v.trim().to_string())))
            .unwrap_or(("ALLOWED_ORIGIN", "http://localhost:3000".to_string()));
        // credentialed CORS needs a concrete origin
        if allowed_origin == "*" {
            return Err(ConfigError::Invalid {
                key: origin_key.to_string(),
                value: allowed_origin,
            });
        }

        Ok(Self {
            server: ServerConfig {
                host: get("HOST", "0.0.0.0"),
                port: parse(&lookup, "PORT", 8000)?,
                allowed_origin,
            },
            neo4j: Neo4jConfig {
                uri: get("NEO4J_URI", "bolt://localhost:7687"),
                user: get("NEO4J_USERNAME", "neo4j"),
                password: get("NEO4J_PASSWORD", "password"),
                database: get("NEO4J_DATABASE", "neo4j"),
            },
            llm: LlmConfig {
                base_url: get("OLLAMA_BASE_URL", "http://localhost:11434"),
                model: get("CHAT_LLM", "llama3"),
                timeout: Duration::from_secs(parse(&lookup, "LLM_TIMEOUT_SECS", 120)?),
            },
            conversation: ConversationConfig {
                max_turns: parse(&lookup, "CONVERSATION_MAX_TURNS", defaults.max_turns)?,
                max_history_chars: parse(
                    &lookup,
                    "CONVERSATION_MAX_HISTORY_CHARS",
                    defaults.max_history_chars,
                )?,
                max_context_chars: parse(
                    &lookup,
                    "THEOREM_CONTEXT_MAX_CHARS",
                    defaults.max_context_chars,
                )?,
                idle_ttl: Duration::from_secs(parse(
                    &lookup,
                    "CONVERSATION_IDLE_TTL_SECS",
                    defaults.idle_ttl.as_secs(),
                )?),
            },
        })
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> ConfigResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
