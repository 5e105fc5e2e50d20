//! Conversation messages for agent state.
//!
//! Roles: System (first in the list), User, Assistant, and Tool for results
//! fed back after an invocation. History is append-only within a run.

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// System prompt; typically placed first in the message list.
    System(String),
    /// User input, including correction re-prompts.
    User(String),
    /// Model reply.
    Assistant(String),
    /// Result of one tool invocation (success text or in-band error text).
    Tool { name: String, content: String },
}

impl Message {
    /// Builds a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    /// Builds a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// Builds an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    /// Builds a tool-role message carrying one invocation's result.
    pub fn tool(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Role label, e.g. for history rendering.
    pub fn role(&self) -> &'static str {
        match self {
            Self::System(_) => "system",
            Self::User(_) => "user",
            Self::Assistant(_) => "assistant",
            Self::Tool { .. } => "tool",
        }
    }

    /// Message text.
    pub fn content(&self) -> &str {
        match self {
            Self::System(c) | Self::User(c) | Self::Assistant(c) => c,
            Self::Tool { content, .. } => content,
        }
    }
}
