use serde::{Deserialize, Serialize};

use crate::store::Message;

pub const SYSTEM_PROMPT_TEMPLATE: &str = "You are BuddyAI, an expert AI coding assistant. \
     You help with programming, debugging, code review, and learning. \
     Always format code properly with language specification. Be concise but thorough.\n\
     Current model: {model}";

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_system_prompt(model: &str) -> String {
    // {model} is a placeholder for string replacement, not a format argument
    SYSTEM_PROMPT_TEMPLATE.replace("{model}", model)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the `messages` array sent to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Body of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Builds a request from the session transcript.
    ///
    /// The system prompt comes first, then every stored message in order.
    /// When `last_user_content` is given it replaces the content of the
    /// final user message (used to attach fetched URL text).
    pub fn from_history(
        model: &str,
        history: &[Message],
        last_user_content: Option<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage {
            role: Role::System,
            content: build_system_prompt(model),
        });
        messages.extend(history.iter().map(|m| ChatMessage {
            role: if m.is_user { Role::User } else { Role::Assistant },
            content: m.content.clone(),
        }));

        if let Some(content) = last_user_content
            && let Some(last_user) = messages.iter_mut().rev().find(|m| m.role == Role::User)
        {
            last_user.content = content;
        }

        Self {
            model: model.to_string(),
            messages,
            max_tokens,
            temperature,
        }
    }
}
