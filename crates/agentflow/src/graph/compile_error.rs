//! Graph compilation errors.
//!
//! Returned by `StateGraph::compile`; the graph is validated once here so
//! `CompiledGraph::run` never has to discover wiring problems mid-run.

use thiserror::Error;

/// A structural problem found while compiling a graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// Two `add_node` calls used the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// An edge endpoint or the start id was never registered via `add_node`.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// `set_start` was never called.
    #[error("start node not set")]
    StartNotSet,

    /// A non-terminal node has no outgoing edge; the run would dead-end.
    #[error("non-terminal node '{0}' has no outgoing edge")]
    MissingEdge(String),

    /// No node of kind `Terminal` is registered; the run could never finish.
    #[error("graph has no terminal node")]
    NoTerminalNode,

    /// A registered node cannot be reached from the start node.
    #[error("node '{0}' is unreachable from the start node")]
    UnreachableNode(String),
}
