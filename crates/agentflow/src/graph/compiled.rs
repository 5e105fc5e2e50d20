//! Compiled graph: immutable, supports `run` only.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use super::edge::Edge;
use super::node::{Node, NodeKind};
use crate::error::GraphError;
use crate::trace::{TraceEvent, TraceKind, TraceSink};

/// Immutable, runnable graph produced by `StateGraph::compile`.
///
/// Holds no per-run mutable state: each `run` owns its state argument, so one
/// compiled graph can drive many concurrent runs.
pub struct CompiledGraph<S> {
    pub(super) nodes: HashMap<String, Box<dyn Node<S>>>,
    pub(super) edges: HashMap<String, Edge<S>>,
    pub(super) start: String,
    pub(super) sink: Arc<dyn TraceSink>,
}

impl<S> std::fmt::Debug for CompiledGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

impl<S> CompiledGraph<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Runs the graph from the start node until a terminal node returns.
    ///
    /// One node executes to completion per step, strictly sequentially; the
    /// step budget bounds the loop: exactly `max_steps` node executions are
    /// allowed before `StepLimitExceeded`. Limit errors are fatal to the run
    /// and surfaced to the caller; tool and parse failures were already fed
    /// back in-band by the nodes themselves.
    pub async fn run(&self, state: S, max_steps: usize) -> Result<S, GraphError> {
        let mut state = state;
        let mut current = self.start.clone();
        let mut steps = 0usize;
        self.emit(TraceKind::RunStarted, &current, json!({"max_steps": max_steps}));

        loop {
            if steps == max_steps {
                return Err(GraphError::StepLimitExceeded(max_steps));
            }
            steps += 1;
            self.emit(TraceKind::NodeEntered, &current, json!({"step": steps}));

            // Compile-time validation guarantees presence.
            let node = self.nodes.get(&current).expect("compiled graph has all nodes");
            state = node.run(state, self.sink.as_ref()).await?;

            if node.kind() == NodeKind::Terminal {
                self.emit(TraceKind::RunFinished, &current, json!({"steps": steps}));
                return Ok(state);
            }

            let edge = self
                .edges
                .get(&current)
                .expect("compiled graph: non-terminal node has an edge");
            current = match edge {
                Edge::To(next) => next.clone(),
                Edge::Decide { targets, resolver } => {
                    let next = resolver(&state);
                    if !targets.contains(&next) {
                        return Err(GraphError::InvalidTransition {
                            node: current.clone(),
                            target: next,
                        });
                    }
                    next
                }
            };
        }
    }

    /// Entry node id.
    pub fn start_node(&self) -> &str {
        &self.start
    }

    fn emit(&self, kind: TraceKind, node: &str, payload: serde_json::Value) {
        self.sink.emit(TraceEvent::now(kind, node, payload));
    }
}
