//! Transitions: fixed successors and declared-target decision edges.

use std::fmt;
use std::sync::Arc;

/// Transition out of a node.
///
/// Decision edges declare their candidate targets up front so the compiler
/// can validate registration and reachability; the resolver picks among them
/// at run time. Resolvers must be pure functions of the state (deterministic,
/// side-effect-free) to keep transitions auditable.
pub enum Edge<S> {
    /// Always go to the named node.
    To(String),
    /// Route by inspecting the state; the result must be one of `targets`.
    Decide {
        targets: Vec<String>,
        resolver: Arc<dyn Fn(&S) -> String + Send + Sync>,
    },
}

impl<S> Edge<S> {
    /// Candidate successor names.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Edge::To(t) => vec![t.as_str()],
            Edge::Decide { targets, .. } => targets.iter().map(String::as_str).collect(),
        }
    }
}

impl<S> fmt::Debug for Edge<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::To(t) => f.debug_tuple("To").field(t).finish(),
            Edge::Decide { targets, .. } => {
                f.debug_struct("Decide").field("targets", targets).finish()
            }
        }
    }
}
