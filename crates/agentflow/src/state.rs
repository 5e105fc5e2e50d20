//! Agent state: conversation history plus named slots.
//!
//! One `AgentState` instance is owned by a single run and passed through
//! every node step; the compiled graph itself holds no per-run mutable state,
//! so one graph definition can serve many concurrent runs.

use std::collections::HashMap;

use serde_json::Value;

use crate::message::Message;

/// Mutable per-run state: append-only message history and scratch slots.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    /// Conversation history, append-only within a run.
    pub messages: Vec<Message>,
    /// Named scratch values (parsed outputs, last tool result, ...).
    pub slots: HashMap<String, Value>,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded with a single user message.
    pub fn with_user(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(content)],
            slots: HashMap::new(),
        }
    }

    /// Appends a message to the history.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Content of the most recent assistant message, if any.
    pub fn last_assistant(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant(c) => Some(c.as_str()),
            _ => None,
        })
    }

    /// Sets a named slot.
    pub fn set_slot(&mut self, name: impl Into<String>, value: Value) {
        self.slots.insert(name.into(), value);
    }

    /// Reads a named slot.
    pub fn slot(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }
}
