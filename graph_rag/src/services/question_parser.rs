use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::llm::{LanguageModel, LlmResult};
use crate::prompts;

/// Replies that mean "no theorem is relevant" under the plain-text contract.
const NO_CONTEXT_SENTINELS: &[&str] = &["no algebra", "whatever", "none", "no theorems"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionDecision {
    NoContext,
    Theorems(Vec<String>),
}

impl QuestionDecision {
    fn from_names(names: Vec<String>) -> Self {
        if names.is_empty() {
            QuestionDecision::NoContext
        } else {
            QuestionDecision::Theorems(names)
        }
    }
}

/// Asks the model which theorems a question needs.
#[derive(Clone)]
pub struct QuestionParser {
    model: Arc<dyn LanguageModel>,
}

impl QuestionParser {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn parse(&self, chat_history: &str, question: &str) -> LlmResult<QuestionDecision> {
        let prompt = prompts::parse_question(chat_history, question);
        let raw = self.model.generate(&prompt).await?;
        debug!(model = self.model.model_name(), raw = %raw, "question parser reply");

        Ok(interpret(&raw))
    }
}

/// Turn a parser reply into a decision.
///
/// A JSON reply (`{"theorems": [...]}` or a bare array, possibly fenced or
/// wrapped in prose) is preferred. A JSON string, whether the whole reply or
/// the `theorems` value, is read under the plain-text contract: a sentinel
/// means no context, otherwise names are split on `;`.
pub fn interpret(raw: &str) -> QuestionDecision {
    let text = raw.trim().trim_matches('\u{feff}');

    match extract_json(text) {
        Some(value) => decision_from_json(&value).unwrap_or_else(|| {
            warn!(reply = %text, "Parser reply is JSON of an unexpected shape, answering without context");
            QuestionDecision::NoContext
        }),
        None => interpret_text(text),
    }
}

fn interpret_text(text: &str) -> QuestionDecision {
    let text = text.trim();
    let lowered = text.to_lowercase();

    if lowered.is_empty() || NO_CONTEXT_SENTINELS.contains(&lowered.as_str()) {
        return QuestionDecision::NoContext;
    }

    QuestionDecision::from_names(
        text.split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn decision_from_json(value: &Value) -> Option<QuestionDecision> {
    match value {
        Value::String(text) => Some(interpret_text(text)),
        Value::Null => Some(QuestionDecision::NoContext),
        Value::Array(items) => names_from_items(items).map(QuestionDecision::from_names),
        Value::Object(map) => match map.get("theorems")? {
            Value::Object(_) => None,
            inner => decision_from_json(inner),
        },
        Value::Bool(_) | Value::Number(_) => None,
    }
}

fn names_from_items(items: &[Value]) -> Option<Vec<String>> {
    let mut names = Vec::with_capacity(items.len());
    for item in items {
        let name = item.as_str()?.trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Some(names)
}

/// Find JSON in model output: the whole reply, a fenced block, or the
/// outermost braces.
fn extract_json(text: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(text) {
        return Some(v);
    }

    for fence in ["```json", "```"] {
        if let Some(start) = text.find(fence) {
            let body = &text[start + fence.len()..];
            if let Some(end) = body.find("```") {
                if let Ok(v) = serde_json::from_str::<Value>(body[..end].trim()) {
                    return Some(v);
                }
            }
        }
    }

    if let (Some(i), Some(j)) = (text.find('{'), text.rfind('}')) {
        if i < j {
            if let Ok(v) = serde_json::from_str::<Value>(&text[i..=j]) {
                if v.is_object() {
                    return Some(v);
                }
            }
        }
    }

    None
}
