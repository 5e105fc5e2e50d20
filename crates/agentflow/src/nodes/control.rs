//! Control nodes: decision points and terminals.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GraphError;
use crate::graph::{Node, NodeKind};
use crate::trace::TraceSink;

/// Pure routing point: leaves the state untouched.
///
/// Pair it with a conditional edge; the edge's resolver does the actual
/// routing so all side effects stay in step nodes.
pub struct DecisionNode<S> {
    id: String,
    _state: PhantomData<fn(S) -> S>,
}

impl<S> DecisionNode<S> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            _state: PhantomData,
        }
    }
}

#[async_trait]
impl<S> Node<S> for DecisionNode<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Decision
    }

    async fn run(&self, state: S, _trace: &dyn TraceSink) -> Result<S, GraphError> {
        Ok(state)
    }
}

/// Run end: executes (identity by default), then the graph returns its state.
pub struct TerminalNode<S> {
    id: String,
    f: Option<Arc<dyn Fn(S) -> Result<S, GraphError> + Send + Sync>>,
}

impl<S> TerminalNode<S> {
    /// Identity terminal: the state passes through unchanged.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            f: None,
        }
    }

    /// Terminal with a final shaping step.
    pub fn with_step<F>(id: impl Into<String>, f: F) -> Self
    where
        F: Fn(S) -> Result<S, GraphError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            f: Some(Arc::new(f)),
        }
    }
}

#[async_trait]
impl<S> Node<S> for TerminalNode<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Terminal
    }

    async fn run(&self, state: S, _trace: &dyn TraceSink) -> Result<S, GraphError> {
        match &self.f {
            Some(f) => f(state),
            None => Ok(state),
        }
    }
}
