//! State graph builder: nodes, edges, start node, compile-time validation.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use super::compile_error::CompilationError;
use super::compiled::CompiledGraph;
use super::edge::Edge;
use super::node::{Node, NodeKind};
use crate::trace::{NoopSink, TraceSink};

/// Graph under construction: nodes plus an explicit adjacency map.
///
/// Generic over state type `S`. Build with `add_node`, wire with `add_edge` /
/// `add_conditional_edge`, pick the entry with `set_start`, then `compile()`
/// to obtain an immutable, runnable graph.
pub struct StateGraph<S> {
    nodes: HashMap<String, Box<dyn Node<S>>>,
    edges: HashMap<String, Edge<S>>,
    start: Option<String>,
    sink: Arc<dyn TraceSink>,
    duplicates: Vec<String>,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Creates an empty graph with a no-op trace sink.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            start: None,
            sink: Arc::new(NoopSink),
            duplicates: Vec::new(),
        }
    }

    /// Sets the trace sink the compiled graph will emit to (builder).
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Adds a node under its own id.
    ///
    /// Returns `&mut Self` for chaining. Re-using an id is recorded and
    /// reported by `compile()` as `DuplicateNode`.
    pub fn add_node(&mut self, node: Box<dyn Node<S>>) -> &mut Self {
        let id = node.id().to_string();
        if self.nodes.insert(id.clone(), node).is_some() {
            self.duplicates.push(id);
        }
        self
    }

    /// Wires a fixed transition `from -> to`.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.insert(from.into(), Edge::To(to.into()));
        self
    }

    /// Wires a decision transition with its candidate targets declared.
    ///
    /// The resolver must be a pure function of the state returning one of
    /// `targets`; anything else fails the run with `InvalidTransition`.
    pub fn add_conditional_edge<F>(
        &mut self,
        from: impl Into<String>,
        targets: Vec<String>,
        resolver: F,
    ) -> &mut Self
    where
        F: Fn(&S) -> String + Send + Sync + 'static,
    {
        self.edges.insert(
            from.into(),
            Edge::Decide {
                targets,
                resolver: Arc::new(resolver),
            },
        );
        self
    }

    /// Declares the entry node.
    pub fn set_start(&mut self, id: impl Into<String>) -> &mut Self {
        self.start = Some(id.into());
        self
    }

    /// Validates the wiring and produces an immutable, runnable graph.
    ///
    /// Checks, in order: no duplicate node ids; a start node is set and
    /// registered; every edge endpoint is registered; every non-terminal node
    /// has an outgoing edge; at least one terminal node exists; every node is
    /// reachable from the start.
    pub fn compile(self) -> Result<CompiledGraph<S>, CompilationError> {
        if let Some(dup) = self.duplicates.into_iter().next() {
            return Err(CompilationError::DuplicateNode(dup));
        }
        let start = self.start.ok_or(CompilationError::StartNotSet)?;
        if !self.nodes.contains_key(&start) {
            return Err(CompilationError::NodeNotFound(start));
        }
        for (from, edge) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            for target in edge.targets() {
                if !self.nodes.contains_key(target) {
                    return Err(CompilationError::NodeNotFound(target.to_string()));
                }
            }
        }
        let mut has_terminal = false;
        for (id, node) in &self.nodes {
            if node.kind() == NodeKind::Terminal {
                has_terminal = true;
            } else if !self.edges.contains_key(id) {
                return Err(CompilationError::MissingEdge(id.clone()));
            }
        }
        if !has_terminal {
            return Err(CompilationError::NoTerminalNode);
        }

        // BFS over declared targets; decision edges contribute all candidates.
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        seen.insert(start.as_str());
        queue.push_back(start.as_str());
        while let Some(id) = queue.pop_front() {
            if let Some(edge) = self.edges.get(id) {
                for target in edge.targets() {
                    if seen.insert(target) {
                        queue.push_back(target);
                    }
                }
            }
        }
        if let Some(unreached) = self
            .nodes
            .keys()
            .find(|id| !seen.contains(id.as_str()))
        {
            return Err(CompilationError::UnreachableNode(unreached.clone()));
        }

        Ok(CompiledGraph {
            nodes: self.nodes,
            edges: self.edges,
            start,
            sink: self.sink,
        })
    }
}
