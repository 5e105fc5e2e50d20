//! Graph state machine: nodes + explicit edges, compile and run.
//!
//! Build with `StateGraph::add_node` / `add_edge` / `add_conditional_edge` /
//! `set_start`, then `compile()` to get an immutable `CompiledGraph` that
//! `run`s with per-run state and a step budget. All wiring is validated at
//! construction, not discovered during a run.

mod compile_error;
mod compiled;
mod edge;
mod node;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledGraph;
pub use edge::Edge;
pub use node::{Node, NodeKind};
pub use state_graph::StateGraph;
