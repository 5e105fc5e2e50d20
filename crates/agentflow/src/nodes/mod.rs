//! Node implementations over `AgentState`.
//!
//! - `LlmNode`: LLM turn with the tool-calling and structured-output
//!   sub-protocols
//! - `ToolNode`: direct tool invocation without an LLM turn
//! - `FnNode`: plain closure step
//! - `DecisionNode` / `TerminalNode`: routing point and run end

mod control;
mod fn_node;
mod llm_node;
mod tool_node;

pub use control::{DecisionNode, TerminalNode};
pub use fn_node::FnNode;
pub use llm_node::LlmNode;
pub use tool_node::ToolNode;
