//! Error types shared across modules.
//!
//! - `RegistryError`: tool registration and lookup failures
//! - `ToolFailure`: in-band tool invocation failure, carried inside `ToolResult`
//! - `TemplateError`: prompt template rendering errors
//! - `GraphError`: run-fatal errors surfaced by `CompiledGraph::run`
//!
//! Module-local errors live next to their producers, as with
//! `schema::ParseError`, `llm::LlmError`, and `graph::CompilationError`.

use thiserror::Error;

use crate::llm::LlmError;
use crate::schema::ParseError;

/// Tool registration and lookup errors.
///
/// Returned by `ToolRegistry::register` and `ToolRegistry::get`, and by
/// `FunctionTool::build` when a declared parameter schema cannot be formed.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A tool's declared interface could not be turned into a valid schema
    /// (e.g. empty name, duplicate parameter names).
    #[error("schema inference failed for tool '{tool}': {reason}")]
    SchemaInference { tool: String, reason: String },

    /// Lookup by a name that was never registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Registering a second tool under an existing name. Shadowing is a
    /// registration error, not a replace.
    #[error("tool already registered: {0}")]
    Duplicate(String),
}

/// One tool invocation's failure, converted to data rather than raised.
///
/// Carried inside `ToolResult::outcome` so the graph can append it to the
/// conversation and let the LLM self-correct.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolFailure {
    /// The requested tool name is not registered (checked at dispatch).
    #[error("unknown tool '{0}'; use one of the listed tools or none")]
    UnknownTool(String),

    /// Arguments failed validation against the tool's parameter schema.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The wrapped callable itself failed; original message preserved.
    #[error("execution failed: {0}")]
    Execution(String),
}

/// Prompt template rendering error.
///
/// Produced by `PromptTemplate::render` when a placeholder has neither a
/// binding nor a default.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("missing binding for placeholder: {0}")]
    MissingBinding(String),
}

/// Run-fatal errors from the graph state machine.
///
/// Tool and parse failures are fed back into the conversation first; only the
/// bounded-retry limits and adapter failures end a run with one of these.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The run reached `max_steps` node executions without a terminal node.
    #[error("step limit exceeded: {0} steps")]
    StepLimitExceeded(usize),

    /// An LLM-call node received tool-call responses past its retry limit.
    #[error("tool loop exceeded at node '{node}': limit {limit}")]
    ToolLoopExceeded { node: String, limit: usize },

    /// Structured output still failed to parse after the correction re-prompt.
    #[error("output validation failed: {0}")]
    OutputValidation(ParseError),

    /// The LLM adapter failed; surfaced immediately, no retry in the core.
    #[error("llm call failed: {0}")]
    Llm(#[from] LlmError),

    /// A decision resolver returned a name outside its declared targets.
    #[error("invalid transition from '{node}' to undeclared target '{target}'")]
    InvalidTransition { node: String, target: String },

    /// A node step failed for a node-specific reason.
    #[error("node step failed: {0}")]
    Step(String),
}
