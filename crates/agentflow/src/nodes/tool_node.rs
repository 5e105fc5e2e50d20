//! Tool-exec node: invoke one named tool directly, no LLM turn.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::GraphError;
use crate::graph::{Node, NodeKind};
use crate::message::Message;
use crate::state::AgentState;
use crate::tool::ToolRegistry;
use crate::trace::{TraceEvent, TraceKind, TraceSink};

/// Invokes a fixed tool with arguments from a state slot (or fixed args).
///
/// Failures stay in-band: the result or error text is appended as a tool-role
/// message and stored in the output slot, and the run continues — routing
/// around a failed invocation is a decision edge's job.
pub struct ToolNode {
    id: String,
    registry: Arc<ToolRegistry>,
    tool: String,
    args_slot: Option<String>,
    args: Value,
    output_slot: String,
}

impl ToolNode {
    pub fn new(
        id: impl Into<String>,
        registry: Arc<ToolRegistry>,
        tool: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            output_slot: format!("{id}_result"),
            id,
            registry,
            tool: tool.into(),
            args_slot: None,
            args: json!({}),
        }
    }

    /// Reads arguments from the named slot at run time (builder).
    pub fn with_args_slot(mut self, slot: impl Into<String>) -> Self {
        self.args_slot = Some(slot.into());
        self
    }

    /// Uses fixed arguments (builder).
    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    /// Names the slot that receives the result value or error (builder).
    pub fn with_output_slot(mut self, slot: impl Into<String>) -> Self {
        self.output_slot = slot.into();
        self
    }
}

#[async_trait]
impl Node<AgentState> for ToolNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> NodeKind {
        NodeKind::ToolExec
    }

    async fn run(&self, state: AgentState, trace: &dyn TraceSink) -> Result<AgentState, GraphError> {
        let mut state = state;
        let args = match &self.args_slot {
            Some(slot) => state.slot(slot).cloned().unwrap_or(json!({})),
            None => self.args.clone(),
        };
        let result = self.registry.invoke(&self.tool, &args);
        trace.emit(TraceEvent::now(
            TraceKind::ToolInvoked,
            &self.id,
            json!({"tool": self.tool, "ok": result.outcome.is_ok()}),
        ));
        state.push(Message::tool(result.name.clone(), result.content_text()));
        state.set_slot(
            &self.output_slot,
            match &result.outcome {
                Ok(v) => v.clone(),
                Err(f) => json!({"error": f.to_string()}),
            },
        );
        Ok(state)
    }
}
