//! Runnable demo: a two-node agent graph answering an arithmetic question.
//!
//! A scripted mock LLM first requests the calculator tool, then phrases the
//! final answer. Run with `RUST_LOG=debug` to see the trace events.
//!
//! Run: cargo run --example calculator_agent

use std::sync::Arc;

use agentflow::{
    AgentState, CalculatorTool, LlmNode, LlmResponse, MockLlm, PromptTemplate, StateGraph,
    TerminalNode, ToolRegistry, TracingSink,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "calculator_agent=info".into()),
        )
        .init();

    let mut registry = ToolRegistry::new();
    registry.register(CalculatorTool::new())?;
    let registry = Arc::new(registry);

    // A real deployment would plug in an API-backed LlmClient here.
    let llm = Arc::new(MockLlm::script(vec![
        LlmResponse::tool_call("calculator", json!({"expression": "21 * 2"})),
        LlmResponse::text("21 * 2 = 42"),
    ]));

    let mut graph = StateGraph::<AgentState>::new().with_trace_sink(Arc::new(TracingSink));
    graph
        .add_node(Box::new(
            LlmNode::new("chat", llm, registry)
                .with_all_tools()
                .with_system_template(PromptTemplate::new(
                    "You are a careful assistant. Use tools when math is involved.\n{tools}",
                )),
        ))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_edge("chat", "end")
        .set_start("chat");

    let state = graph
        .compile()?
        .run(AgentState::with_user("What is 21 * 2?"), 10)
        .await?;

    for message in &state.messages {
        println!("[{}] {}", message.role(), message.content());
    }
    Ok(())
}
