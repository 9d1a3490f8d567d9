pub mod chat_service;
pub mod conversation;
pub mod question_parser;
pub mod retrieval;

pub use chat_service::ChatService;
pub use conversation::{ConversationStore, Turn};
pub use question_parser::{QuestionDecision, QuestionParser};
pub use retrieval::TheoremRetriever;
