//! Text-in/text-out access to a language model.

pub mod ollama;
pub mod scripted;

pub use ollama::OllamaClient;
pub use scripted::ScriptedModel;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model runtime returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unreadable model response: {0}")]
    Decode(String),

    #[error("no scripted response left")]
    NoResponse,
}

pub type LlmResult<T> = Result<T, LlmError>;

/// Which template a prompt was rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    ParseQuestion,
    AnswerWithoutRag,
    AnswerWithRag,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::ParseQuestion => "parse_question",
            PromptKind::AnswerWithoutRag => "answer_without_rag",
            PromptKind::AnswerWithRag => "answer_with_rag",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub system: String,
    pub text: String,
    /// Ask the runtime to constrain output to a JSON document
    pub expects_json: bool,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> LlmResult<String>;

    /// Name reported in logs
    fn model_name(&self) -> &str;
}
