//! Plain closure node: state in, state out.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GraphError;
use crate::graph::{Node, NodeKind};
use crate::trace::TraceSink;

/// Wraps a synchronous closure as a graph step.
pub struct FnNode<S> {
    id: String,
    f: Arc<dyn Fn(S) -> Result<S, GraphError> + Send + Sync>,
}

impl<S> FnNode<S> {
    pub fn new<F>(id: impl Into<String>, f: F) -> Self
    where
        F: Fn(S) -> Result<S, GraphError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            f: Arc::new(f),
        }
    }
}

#[async_trait]
impl<S> Node<S> for FnNode<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Step
    }

    async fn run(&self, state: S, _trace: &dyn TraceSink) -> Result<S, GraphError> {
        (self.f)(state)
    }
}
