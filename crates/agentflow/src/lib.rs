//! agentflow: LLM agents as explicit state machines.
//!
//! Graphs of nodes (LLM call, tool exec, decision, terminal) wired by
//! explicit edges, validated at construction, run with per-run state and a
//! step budget. Tool and parse failures are converted to data and fed back
//! into the conversation so the model can self-correct; only the bounded
//! retry limits end a run.
//!
//! Build a `ToolRegistry`, an `LlmClient` implementation, a `StateGraph`
//! over `AgentState`, then `compile()` and `run(state, max_steps)`.

pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod nodes;
pub mod prompt;
pub mod schema;
pub mod state;
pub mod tool;
pub mod trace;

pub use error::{GraphError, RegistryError, TemplateError, ToolFailure};
pub use graph::{CompilationError, CompiledGraph, Edge, Node, NodeKind, StateGraph};
pub use llm::{LlmClient, LlmError, LlmResponse, MockLlm, ToolCall};
pub use message::Message;
pub use nodes::{DecisionNode, FnNode, LlmNode, TerminalNode, ToolNode};
pub use prompt::{render_history, render_tool_list, PromptTemplate};
pub use schema::{FieldSpec, OutputSchema, ParseError, SemanticType};
pub use state::AgentState;
pub use tool::{CalculatorTool, FunctionTool, ParamSpec, Tool, ToolRegistry, ToolResult, ToolSpec};
pub use trace::{MemorySink, NoopSink, TraceEvent, TraceKind, TraceSink, TracingSink};
