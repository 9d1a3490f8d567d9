use std::sync::Arc;
use theograph_graph::TheoremStore;
use theograph_models::{ChatRequest, ChatResponse, RetrievedTheorem};
use tracing::{info, instrument};

use super::conversation::ConversationStore;
use super::question_parser::{QuestionDecision, QuestionParser};
use super::retrieval::TheoremRetriever;
use crate::errors::{RagError, RagResult};
use crate::llm::LanguageModel;
use crate::prompts;

/// Answers chat messages, pulling theorem context from the graph when the
/// question calls for it.
pub struct ChatService {
    model: Arc<dyn LanguageModel>,
    parser: QuestionParser,
    retriever: TheoremRetriever,
    conversations: Arc<ConversationStore>,
    max_context_chars: usize,
}

impl ChatService {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        store: Option<Arc<dyn TheoremStore>>,
        conversations: Arc<ConversationStore>,
        max_context_chars: usize,
    ) -> Self {
        Self {
            parser: QuestionParser::new(model.clone()),
            model,
            retriever: TheoremRetriever::new(store),
            conversations,
            max_context_chars,
        }
    }

    pub fn conversations(&self) -> &Arc<ConversationStore> {
        &self.conversations
    }

    pub fn retriever(&self) -> &TheoremRetriever {
        &self.retriever
    }

    #[instrument(skip(self, request), fields(conversation_id = %request.conversation_id))]
    pub async fn respond(&self, request: ChatRequest) -> RagResult<ChatResponse> {
        let question = request.message.trim();
        if question.is_empty() {
            return Err(RagError::InvalidRequest("message must not be empty".to_string()));
        }
        let conversation_id = request.conversation_id.trim();
        if conversation_id.is_empty() {
            return Err(RagError::InvalidRequest(
                "conversation_id must not be empty".to_string(),
            ));
        }

        let history = self.conversations.render_history(conversation_id);
        let decision = self.parser.parse(&history, question).await?;

        let (prompt, sources) = match decision {
            QuestionDecision::NoContext => {
                info!("Answering without theorem context");
                (prompts::answer_without_rag(&history, question), Vec::new())
            }
            QuestionDecision::Theorems(names) => {
                info!(candidates = ?names, "Retrieving theorems");
                let mut sources: Vec<RetrievedTheorem> = self.retriever.retrieve(&names).await?;
                let context = prompts::render_theorems(&sources, self.max_context_chars);
                info!(
                    retrieved = sources.len(),
                    in_context = context.included,
                    "Answering with theorem context"
                );
                // only report theorems the model actually saw
                sources.truncate(context.included);
                (prompts::answer_with_rag(&history, question, &context.text), sources)
            }
        };

        let answer = self.model.generate(&prompt).await?;
        self.conversations.record(conversation_id, question, answer.as_str());

        Ok(ChatResponse {
            response: answer,
            conversation_id: conversation_id.to_string(),
            sources,
        })
    }
}
