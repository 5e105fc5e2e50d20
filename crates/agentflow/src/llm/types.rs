//! Adapter response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single tool invocation requested by the LLM.
///
/// `arguments` uses the same JSON encoding as structured output; the registry
/// validates them against the tool's parameter schema at dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Tool name as registered in the `ToolRegistry`.
    pub name: String,
    /// Argument object (JSON).
    pub arguments: Value,
    /// Optional id to correlate the call with its result.
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
            id: None,
        }
    }
}

/// What one `generate` call produced: free text, and/or requested tool calls.
///
/// A non-empty `tool_calls` drives the graph's tool-calling sub-protocol; an
/// empty one means the content is the (possibly structured) answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LlmResponse {
    /// Assistant text (may wrap a structured ```json block).
    pub content: String,
    /// Tool invocations the model requested this turn.
    pub tool_calls: Vec<ToolCall>,
}

impl LlmResponse {
    /// Plain text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Response requesting a single tool call.
    pub fn tool_call(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            content: String::new(),
            tool_calls: vec![ToolCall::new(name, arguments)],
        }
    }
}
