//! Core types for chat-model interactions

use serde::{Deserialize, Serialize};

/// Message roles in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Get the wire name for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single conversation message. Ordered by insertion; immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Context for a model request
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    /// System prompt
    pub system_prompt: Option<String>,
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
}

impl ChatContext {
    /// Create a new context with a system prompt
    pub fn with_system(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: Some(system_prompt.into()),
            messages: vec![],
        }
    }

    /// Add a message to the context
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

/// Generation options forwarded to the backend
#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    /// Sampling temperature
    pub temperature: f32,
    /// Penalty applied to repeated tokens
    pub repeat_penalty: f32,
    /// Maximum number of tokens to generate
    pub num_predict: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        // Tuned for small local models: a strong repeat penalty and a hard
        // output cap keep responses short and loop-resistant.
        Self {
            temperature: 0.7,
            repeat_penalty: 1.5,
            num_predict: 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);

        let parsed: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"hello"}"#).unwrap();
        assert_eq!(parsed.role, Role::Assistant);
        assert_eq!(parsed.content, "hello");
    }

    #[test]
    fn test_context_push_preserves_order() {
        let mut context = ChatContext::with_system("be brief");
        context.push(ChatMessage::user("one"));
        context.push(ChatMessage::assistant("two"));
        assert_eq!(context.system_prompt.as_deref(), Some("be brief"));
        assert_eq!(context.messages[0].content, "one");
        assert_eq!(context.messages[1].content, "two");
    }
}
