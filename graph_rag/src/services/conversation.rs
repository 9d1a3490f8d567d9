use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use theograph_config::ConversationConfig;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

impl Turn {
    fn render(&self) -> String {
        format!("User: {}\nAssistant: {}", self.question, self.answer)
    }
}

#[derive(Debug)]
struct Conversation {
    turns: VecDeque<Turn>,
    last_active: Instant,
}

impl Conversation {
    fn new() -> Self {
        Self {
            turns: VecDeque::new(),
            last_active: Instant::now(),
        }
    }
}

/// Chat histories keyed by conversation id.
///
/// Each conversation keeps at most `max_turns` turns and is dropped once it
/// has been idle for `idle_ttl`.
pub struct ConversationStore {
    conversations: DashMap<String, Conversation>,
    max_turns: usize,
    max_history_chars: usize,
    idle_ttl: Duration,
}

impl ConversationStore {
    pub fn new(config: &ConversationConfig) -> Self {
        Self {
            conversations: DashMap::new(),
            max_turns: config.max_turns.max(1),
            max_history_chars: config.max_history_chars,
            idle_ttl: config.idle_ttl,
        }
    }

    /// Retained turns of a conversation, oldest first.
    pub fn history(&self, conversation_id: &str) -> Vec<Turn> {
        self.conversations
            .get(conversation_id)
            .map(|c| c.turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// History text for a prompt: the newest turns that fit the character
    /// budget, in chronological order.
    pub fn render_history(&self, conversation_id: &str) -> String {
        let Some(conversation) = self.conversations.get(conversation_id) else {
            return String::new();
        };

        let mut kept: Vec<String> = Vec::new();
        let mut used = 0;
        for turn in conversation.turns.iter().rev() {
            let rendered = turn.render();
            let cost = rendered.chars().count() + if kept.is_empty() { 0 } else { 1 };
            if used + cost > self.max_history_chars {
                break;
            }
            used += cost;
            kept.push(rendered);
        }

        kept.reverse();
        kept.join("\n")
    }

    pub fn record(&self, conversation_id: &str, question: impl Into<String>, answer: impl Into<String>) {
        let mut conversation = self
            .conversations
            .entry(conversation_id.to_string())
            .or_insert_with(Conversation::new);

        conversation.turns.push_back(Turn {
            question: question.into(),
            answer: answer.into(),
        });
        while conversation.turns.len() > self.max_turns {
            conversation.turns.pop_front();
        }
        conversation.last_active = Instant::now();
    }

    /// Forget a conversation. Returns whether it existed.
    pub fn reset(&self, conversation_id: &str) -> bool {
        self.conversations.remove(conversation_id).is_some()
    }

    /// Drop every conversation idle for at least `idle_ttl`.
    pub fn evict_idle(&self) -> usize {
        let before = self.conversations.len();
        let ttl = self.idle_ttl;
        self.conversations
            .retain(|_, conversation| conversation.last_active.elapsed() < ttl);
        before.saturating_sub(self.conversations.len())
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Periodically evict idle conversations. Runs until the task is dropped.
    pub async fn run_eviction(self: Arc<Self>, every: Duration) {
        info!(
            "Conversation eviction every {:?}, idle ttl {:?}",
            every, self.idle_ttl
        );
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let evicted = self.evict_idle();
            if evicted > 0 {
                debug!(evicted, remaining = self.len(), "evicted idle conversations");
            }
        }
    }
}
