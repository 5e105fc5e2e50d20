//! End-to-end tests for the agent-facing nodes: tool calling, structured
//! output with correction, and the scripted mock adapter driving a graph.

use std::sync::Arc;

use agentflow::{
    AgentState, CompiledGraph, FunctionTool, GraphError, LlmNode, LlmResponse, MemorySink,
    Message, MockLlm, OutputSchema, ParamSpec, PromptTemplate, SemanticType, StateGraph,
    TerminalNode, ToolNode, ToolRegistry, TraceKind,
};
use serde_json::{json, Value};

fn add_registry() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry
        .register(
            FunctionTool::builder("add")
                .description("adds two integers")
                .param(ParamSpec::required("a", SemanticType::Integer))
                .param(ParamSpec::required("b", SemanticType::Integer))
                .handler(|args| {
                    let a = args.get("a").and_then(Value::as_i64).unwrap_or(0);
                    let b = args.get("b").and_then(Value::as_i64).unwrap_or(0);
                    Ok(Value::from(a + b))
                })
                .build()
                .unwrap(),
        )
        .unwrap();
    Arc::new(registry)
}

fn chat_graph(node: LlmNode, sink: Arc<MemorySink>) -> CompiledGraph<AgentState> {
    let mut graph = StateGraph::<AgentState>::new().with_trace_sink(sink);
    graph
        .add_node(Box::new(node))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_edge("chat", "end")
        .set_start("chat");
    graph.compile().unwrap()
}

#[tokio::test]
async fn tool_call_round_trip() {
    let registry = add_registry();
    let llm = Arc::new(MockLlm::script(vec![
        LlmResponse::tool_call("add", json!({"a": 3, "b": 4})),
        LlmResponse::text("7"),
    ]));
    let node = LlmNode::new("chat", llm.clone(), registry).with_tools(["add"]);
    let sink = Arc::new(MemorySink::new());
    let graph = chat_graph(node, sink.clone());

    let state = graph
        .run(AgentState::with_user("What is 3 + 4?"), 10)
        .await
        .unwrap();

    assert_eq!(state.last_assistant(), Some("7"));
    assert_eq!(llm.call_count(), 2);
    assert_eq!(sink.count(TraceKind::ToolInvoked), 1);

    // The tool result went back into the conversation as a tool message.
    let tool_msg = state
        .messages
        .iter()
        .find_map(|m| match m {
            Message::Tool { name, content } => Some((name.as_str(), content.as_str())),
            _ => None,
        })
        .unwrap();
    assert_eq!(tool_msg, ("add", "7"));
}

#[tokio::test]
async fn unknown_tool_is_fed_back_in_band() {
    let registry = add_registry();
    let llm = Arc::new(MockLlm::script(vec![
        LlmResponse::tool_call("subtract", json!({"a": 9, "b": 2})),
        LlmResponse::text("I can only add."),
    ]));
    let node = LlmNode::new("chat", llm.clone(), registry).with_tools(["add"]);
    let sink = Arc::new(MemorySink::new());
    let graph = chat_graph(node, sink.clone());

    // The run does not fail; the error is data in the conversation.
    let state = graph
        .run(AgentState::with_user("What is 9 - 2?"), 10)
        .await
        .unwrap();

    assert_eq!(state.last_assistant(), Some("I can only add."));
    let error_msg = state
        .messages
        .iter()
        .find_map(|m| match m {
            Message::Tool { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .unwrap();
    assert!(error_msg.starts_with("ERROR:"), "got: {error_msg}");
    assert!(error_msg.contains("unknown tool"), "got: {error_msg}");
}

#[tokio::test]
async fn invalid_arguments_are_fed_back_in_band() {
    let registry = add_registry();
    let llm = Arc::new(MockLlm::script(vec![
        LlmResponse::tool_call("add", json!({"a": "three", "b": 4})),
        LlmResponse::text("done"),
    ]));
    let node = LlmNode::new("chat", llm, registry).with_tools(["add"]);
    let graph = chat_graph(node, Arc::new(MemorySink::new()));

    let state = graph.run(AgentState::with_user("add"), 10).await.unwrap();
    let error_msg = state
        .messages
        .iter()
        .find_map(|m| match m {
            Message::Tool { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .unwrap();
    assert!(error_msg.contains("invalid arguments"), "got: {error_msg}");
}

#[tokio::test]
async fn tool_loop_is_bounded() {
    let registry = add_registry();
    let llm = Arc::new(MockLlm::always(LlmResponse::tool_call(
        "add",
        json!({"a": 1, "b": 1}),
    )));
    let node = LlmNode::new("chat", llm.clone(), registry)
        .with_tools(["add"])
        .with_max_tool_rounds(2);
    let graph = chat_graph(node, Arc::new(MemorySink::new()));

    let err = graph
        .run(AgentState::with_user("loop forever"), 10)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::ToolLoopExceeded { node, limit } if node == "chat" && limit == 2
    ));
    // Two tool rounds were tolerated; the third tool-call response failed.
    assert_eq!(llm.call_count(), 3);
}

#[tokio::test]
async fn tool_loop_boundary_succeeds_at_the_limit() {
    let registry = add_registry();
    let llm = Arc::new(MockLlm::script(vec![
        LlmResponse::tool_call("add", json!({"a": 1, "b": 1})),
        LlmResponse::tool_call("add", json!({"a": 2, "b": 2})),
        LlmResponse::text("2 and 4"),
    ]));
    let node = LlmNode::new("chat", llm.clone(), registry)
        .with_tools(["add"])
        .with_max_tool_rounds(2);
    let graph = chat_graph(node, Arc::new(MemorySink::new()));

    let state = graph.run(AgentState::with_user("sums"), 10).await.unwrap();
    assert_eq!(state.last_assistant(), Some("2 and 4"));
    assert_eq!(llm.call_count(), 3);
}

#[tokio::test]
async fn structured_output_recovers_via_correction_reprompt() {
    let registry = Arc::new(ToolRegistry::new());
    let llm = Arc::new(MockLlm::script(vec![
        LlmResponse::text("The sum is seven."),
        LlmResponse::text("```json\n{\"sum\": 7}\n```"),
    ]));
    let schema = OutputSchema::new().field("sum", SemanticType::Integer);
    let node = LlmNode::new("chat", llm.clone(), registry).with_output_schema(schema);
    let sink = Arc::new(MemorySink::new());
    let graph = chat_graph(node, sink.clone());

    let state = graph
        .run(AgentState::with_user("What is 3 + 4?"), 10)
        .await
        .unwrap();

    assert_eq!(state.slot("output"), Some(&json!({"sum": 7})));
    assert_eq!(llm.call_count(), 2);
    assert_eq!(sink.count(TraceKind::OutputParsed), 1);

    // The correction went into the history as a user message.
    let correction = state
        .messages
        .iter()
        .find_map(|m| match m {
            Message::User(content) if content.contains("output format") => Some(content),
            _ => None,
        })
        .unwrap();
    assert!(correction.contains("```json"), "got: {correction}");
}

#[tokio::test]
async fn structured_output_fails_after_second_malformed_response() {
    let registry = Arc::new(ToolRegistry::new());
    let llm = Arc::new(MockLlm::always(LlmResponse::text("still just prose")));
    let schema = OutputSchema::new().field("sum", SemanticType::Integer);
    let node = LlmNode::new("chat", llm.clone(), registry).with_output_schema(schema);
    let graph = chat_graph(node, Arc::new(MemorySink::new()));

    let err = graph
        .run(AgentState::with_user("What is 3 + 4?"), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::OutputValidation(_)));
    // Exactly one correction re-prompt, no endless retrying.
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn adapter_error_ends_the_run() {
    let registry = Arc::new(ToolRegistry::new());
    let llm = Arc::new(MockLlm::script(vec![]));
    let node = LlmNode::new("chat", llm, registry);
    let graph = chat_graph(node, Arc::new(MemorySink::new()));

    let err = graph
        .run(AgentState::with_user("hello"), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Llm(_)));
}

#[tokio::test]
async fn system_template_is_rendered_once_with_tool_list() {
    let registry = add_registry();
    let llm = Arc::new(MockLlm::text("ok"));
    let node = LlmNode::new("chat", llm, registry)
        .with_tools(["add"])
        .with_system_template(PromptTemplate::new(
            "You are a calculator assistant.\n{tools}",
        ));
    let graph = chat_graph(node, Arc::new(MemorySink::new()));

    let state = graph
        .run(AgentState::with_user("What is 1 + 1?"), 10)
        .await
        .unwrap();

    let Message::System(system) = &state.messages[0] else {
        panic!("expected a system message first, got {:?}", state.messages[0]);
    };
    assert!(system.contains("add"), "got: {system}");
    assert!(system.contains("adds two integers"), "got: {system}");
}

#[tokio::test]
async fn tool_node_runs_a_tool_without_an_llm() {
    let registry = add_registry();
    let sink = Arc::new(MemorySink::new());
    let mut graph = StateGraph::<AgentState>::new().with_trace_sink(sink.clone());
    graph
        .add_node(Box::new(
            ToolNode::new("sum", registry, "add").with_args(json!({"a": 20, "b": 22})),
        ))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_edge("sum", "end")
        .set_start("sum");

    let state = graph
        .compile()
        .unwrap()
        .run(AgentState::new(), 10)
        .await
        .unwrap();

    assert_eq!(state.slot("sum_result"), Some(&json!(42)));
    assert_eq!(sink.count(TraceKind::ToolInvoked), 1);
}
