use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use super::{LanguageModel, LlmError, LlmResult, Prompt};

type Responder = Box<dyn Fn(&Prompt) -> String + Send + Sync>;

/// Model stand-in that replays canned replies and records every prompt.
///
/// Queued replies are served first, in order; once the queue is empty the
/// responder (if any) computes a reply from the prompt.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    responder: Option<Responder>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let model = Self::new();
        for reply in replies {
            model.push_reply(reply);
        }
        model
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&Prompt) -> String + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::default()
        }
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().push_back(reply.into());
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &Prompt) -> LlmResult<String> {
        self.prompts.lock().push(prompt.clone());

        if let Some(reply) = self.replies.lock().pop_front() {
            return Ok(reply);
        }

        self.responder
            .as_ref()
            .map(|respond| respond(prompt))
            .ok_or(LlmError::NoResponse)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
