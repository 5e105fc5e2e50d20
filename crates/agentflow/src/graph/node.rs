//! Graph node trait: one step in a state machine.

use async_trait::async_trait;

use crate::error::GraphError;
use crate::trace::TraceSink;

/// What a node does, reported in trace events and used by the compiler
/// (`Terminal` nodes end a run and need no outgoing edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Calls the LLM adapter; may drive the tool-calling sub-protocol.
    LlmCall,
    /// Invokes a tool directly, without an LLM turn.
    ToolExec,
    /// Pure routing point; pairs with a conditional edge.
    Decision,
    /// Plain state transform.
    Step,
    /// Executes, then the run returns its state as the final result.
    Terminal,
}

/// One step in a graph: state in, state out.
///
/// Routing does not live here; successors are declared as `Edge`s on the
/// `StateGraph`, so the wiring is data that can be validated at construction.
/// The `trace` handle is the run's sink; node-internal events (tool
/// invocations, parsed outputs) go through it.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Node id (e.g. `"chat"`, `"final"`). Must be unique within a graph.
    fn id(&self) -> &str;

    /// Node kind, for tracing and compile-time checks.
    fn kind(&self) -> NodeKind {
        NodeKind::Step
    }

    /// One step: state in, state out.
    async fn run(&self, state: S, trace: &dyn TraceSink) -> Result<S, GraphError>;
}
