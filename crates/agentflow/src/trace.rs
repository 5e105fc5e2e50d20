//! Trace events and sinks.
//!
//! The graph emits structured events as it runs; sinks are external
//! collaborators and must never be able to abort a run. `emit` is infallible
//! by contract and fire-and-forget from the graph's perspective.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    RunStarted,
    NodeEntered,
    LlmCall,
    ToolInvoked,
    OutputParsed,
    RunFinished,
}

/// One structured record of a step's occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub kind: TraceKind,
    /// Name of the node the event belongs to.
    pub node: String,
    /// Event-specific detail (tool name, step count, ...).
    pub payload: Value,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl TraceEvent {
    /// Builds an event stamped with the current time.
    pub fn now(kind: TraceKind, node: impl Into<String>, payload: Value) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            kind,
            node: node.into(),
            payload,
            timestamp_ms,
        }
    }
}

/// Receiver of trace events.
///
/// Implementations must be cheap and non-blocking from the graph's point of
/// view and must swallow their own failures locally.
pub trait TraceSink: Send + Sync {
    fn emit(&self, event: TraceEvent);
}

/// Discards every event. The default sink.
#[derive(Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn emit(&self, _event: TraceEvent) {}
}

/// Forwards events to the `tracing` crate as structured debug records.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn emit(&self, event: TraceEvent) {
        tracing::debug!(
            kind = ?event.kind,
            node = %event.node,
            payload = %event.payload,
            timestamp_ms = event.timestamp_ms,
            "trace event"
        );
    }
}

/// Collects events in memory; useful for tests and post-run inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TraceEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events emitted so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of events of the given kind.
    pub fn count(&self, kind: TraceKind) -> usize {
        self.events().iter().filter(|e| e.kind == kind).count()
    }
}

impl TraceSink for MemorySink {
    fn emit(&self, event: TraceEvent) {
        // A poisoned lock drops the event; a sink must not abort the run.
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
