//! Conversation context — the ordered message history replayed verbatim to the
//! LLM on every generation call.
//!
//! The context is owned by the running session and is the only entity with
//! cross-run persistence (see `checkpoint`). Mutation happens in exactly two
//! places: the cover letter generator and the session runner. At most one
//! `system` message exists per context lifetime.

pub mod checkpoint;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Role tag for one conversation turn. Serialized lowercase to match the
/// wire format of the Messages API and the checkpoint file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered sequence of messages, insertion order significant.
///
/// Serializes transparently as a JSON array of `{role, content}` records so
/// the checkpoint file round-trips to an identical ordered sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationContext {
    messages: Vec<Message>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends a message. Blank-content messages are dropped — persisted
    /// messages must carry non-empty content.
    pub fn push(&mut self, message: Message) {
        if message.content.trim().is_empty() {
            debug!("dropping blank {:?} message from context", message.role);
            return;
        }
        self.messages.push(message);
    }

    pub fn has_system(&self) -> bool {
        self.messages.iter().any(|m| m.role == Role::System)
    }

    /// Inserts a `system` message at the front, only if none exists yet.
    /// Repeated calls are no-ops, so the single-system invariant holds
    /// across any number of generation calls.
    pub fn ensure_system(&mut self, content: &str) {
        if self.has_system() || content.trim().is_empty() {
            return;
        }
        self.messages.insert(0, Message::system(content));
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
    }

    #[test]
    fn test_context_round_trips_identically() {
        let mut ctx = ConversationContext::new();
        ctx.push(Message::system("style rules"));
        ctx.push(Message::user("write a letter"));
        ctx.push(Message::assistant("Dear hiring manager,"));
        ctx.push(Message::user("shorter please"));

        let json = serde_json::to_string(&ctx).unwrap();
        let recovered: ConversationContext = serde_json::from_str(&json).unwrap();

        assert_eq!(recovered, ctx, "round-trip must preserve roles, content, and order");
    }

    #[test]
    fn test_context_serializes_as_plain_array() {
        let mut ctx = ConversationContext::new();
        ctx.push(Message::user("hello"));
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, r#"[{"role":"user","content":"hello"}]"#);
    }

    #[test]
    fn test_blank_messages_are_not_persisted() {
        let mut ctx = ConversationContext::new();
        ctx.push(Message::user("   "));
        ctx.push(Message::assistant(""));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_ensure_system_inserts_at_most_once() {
        let mut ctx = ConversationContext::new();
        ctx.push(Message::user("first request"));
        ctx.ensure_system("voice instructions");
        ctx.ensure_system("different instructions");
        ctx.ensure_system("voice instructions");

        let system_count = ctx
            .messages()
            .iter()
            .filter(|m| m.role == Role::System)
            .count();
        assert_eq!(system_count, 1);
        assert_eq!(ctx.messages()[0].content, "voice instructions");
    }

}
