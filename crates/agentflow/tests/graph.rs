//! Integration tests for StateGraph: compile validation and the run loop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use agentflow::{
    AgentState, CompilationError, DecisionNode, FnNode, GraphError, MemorySink, Message,
    StateGraph, TerminalNode, TraceKind,
};
use serde_json::json;

fn tag_node(id: &str) -> Box<FnNode<AgentState>> {
    let tag = id.to_string();
    Box::new(FnNode::new(id, move |mut state: AgentState| {
        state.push(Message::assistant(tag.clone()));
        Ok(state)
    }))
}

#[tokio::test]
async fn linear_chain_runs_in_order() {
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(tag_node("first"))
        .add_node(tag_node("second"))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_edge("first", "second")
        .add_edge("second", "end")
        .set_start("first");

    let state = graph
        .compile()
        .unwrap()
        .run(AgentState::new(), 10)
        .await
        .unwrap();
    let contents: Vec<&str> = state.messages.iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["first", "second"]);
}

#[tokio::test]
async fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(tag_node("a"))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_edge("a", "missing")
        .set_start("a");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected NodeNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn compile_fails_without_start() {
    let mut graph = StateGraph::<AgentState>::new();
    graph.add_node(Box::new(TerminalNode::new("end")));
    assert!(matches!(
        graph.compile(),
        Err(CompilationError::StartNotSet)
    ));
}

#[tokio::test]
async fn compile_fails_without_terminal() {
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(tag_node("a"))
        .add_node(tag_node("b"))
        .add_edge("a", "b")
        .add_edge("b", "a")
        .set_start("a");
    assert!(matches!(
        graph.compile(),
        Err(CompilationError::NoTerminalNode)
    ));
}

#[tokio::test]
async fn compile_fails_when_non_terminal_dead_ends() {
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(tag_node("a"))
        .add_node(Box::new(TerminalNode::new("end")))
        .set_start("a");
    match graph.compile() {
        Err(CompilationError::MissingEdge(id)) => assert_eq!(id, "a"),
        other => panic!("expected MissingEdge, got {other:?}"),
    }
}

#[tokio::test]
async fn compile_fails_on_unreachable_node() {
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(tag_node("a"))
        .add_node(tag_node("island"))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_edge("a", "end")
        .add_edge("island", "end")
        .set_start("a");
    match graph.compile() {
        Err(CompilationError::UnreachableNode(id)) => assert_eq!(id, "island"),
        other => panic!("expected UnreachableNode, got {other:?}"),
    }
}

#[tokio::test]
async fn compile_fails_on_duplicate_node_id() {
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(tag_node("a"))
        .add_node(tag_node("a"))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_edge("a", "end")
        .set_start("a");
    assert!(matches!(
        graph.compile(),
        Err(CompilationError::DuplicateNode(id)) if id == "a"
    ));
}

#[tokio::test]
async fn conditional_edge_routes_on_state() {
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(Box::new(DecisionNode::new("check")))
        .add_node(tag_node("high"))
        .add_node(tag_node("low"))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_conditional_edge(
            "check",
            vec!["high".into(), "low".into()],
            |state: &AgentState| {
                if state.slot("n").and_then(|v| v.as_i64()).unwrap_or(0) > 10 {
                    "high".to_string()
                } else {
                    "low".to_string()
                }
            },
        )
        .add_edge("high", "end")
        .add_edge("low", "end")
        .set_start("check");
    let compiled = graph.compile().unwrap();

    let mut state = AgentState::new();
    state.set_slot("n", json!(42));
    let out = compiled.run(state, 10).await.unwrap();
    assert_eq!(out.messages.last().unwrap().content(), "high");

    let mut state = AgentState::new();
    state.set_slot("n", json!(3));
    let out = compiled.run(state, 10).await.unwrap();
    assert_eq!(out.messages.last().unwrap().content(), "low");
}

#[tokio::test]
async fn decision_resolver_is_deterministic() {
    let resolver = |state: &AgentState| -> String {
        if state.slot("n").and_then(|v| v.as_i64()).unwrap_or(0) % 2 == 0 {
            "even".to_string()
        } else {
            "odd".to_string()
        }
    };
    let mut state = AgentState::new();
    state.set_slot("n", json!(4));
    assert_eq!(resolver(&state), resolver(&state));
}

#[tokio::test]
async fn step_limit_exceeded_on_cycle() {
    let spins = Arc::new(AtomicUsize::new(0));
    let spins_in_node = spins.clone();
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(Box::new(FnNode::new("spin", move |state: AgentState| {
            spins_in_node.fetch_add(1, Ordering::SeqCst);
            Ok(state)
        })))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_conditional_edge("spin", vec!["spin".into(), "end".into()], |_| {
            "spin".to_string()
        })
        .set_start("spin");

    let err = graph
        .compile()
        .unwrap()
        .run(AgentState::new(), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::StepLimitExceeded(3)));
    // Exactly max_steps node executions happened before the failure.
    assert_eq!(spins.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn undeclared_decision_target_fails_the_run() {
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(tag_node("check"))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_conditional_edge("check", vec!["end".into()], |_| "elsewhere".to_string())
        .set_start("check");

    let err = graph
        .compile()
        .unwrap()
        .run(AgentState::new(), 10)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::InvalidTransition { node, target } if node == "check" && target == "elsewhere"
    ));
}

#[tokio::test]
async fn same_compiled_graph_serves_independent_runs() {
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(tag_node("step"))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_edge("step", "end")
        .set_start("step");
    let compiled = Arc::new(graph.compile().unwrap());

    let a = tokio::spawn({
        let g = compiled.clone();
        async move { g.run(AgentState::with_user("one"), 5).await }
    });
    let b = tokio::spawn({
        let g = compiled.clone();
        async move { g.run(AgentState::with_user("two"), 5).await }
    });
    let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
    assert_eq!(a.messages[0].content(), "one");
    assert_eq!(b.messages[0].content(), "two");
    assert_eq!(a.messages.len(), 2);
    assert_eq!(b.messages.len(), 2);
}

#[tokio::test]
async fn run_emits_lifecycle_events() {
    let sink = Arc::new(MemorySink::new());
    let mut graph = StateGraph::<AgentState>::new().with_trace_sink(sink.clone());
    graph
        .add_node(tag_node("step"))
        .add_node(Box::new(TerminalNode::new("end")))
        .add_edge("step", "end")
        .set_start("step");

    graph
        .compile()
        .unwrap()
        .run(AgentState::new(), 5)
        .await
        .unwrap();

    assert_eq!(sink.count(TraceKind::RunStarted), 1);
    assert_eq!(sink.count(TraceKind::NodeEntered), 2);
    assert_eq!(sink.count(TraceKind::RunFinished), 1);
    let kinds: Vec<TraceKind> = sink.events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds.first(), Some(&TraceKind::RunStarted));
    assert_eq!(kinds.last(), Some(&TraceKind::RunFinished));
}

#[tokio::test]
async fn terminal_step_shapes_final_state() {
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(tag_node("step"))
        .add_node(Box::new(TerminalNode::with_step(
            "end",
            |mut state: AgentState| {
                state.set_slot("finished", json!(true));
                Ok(state)
            },
        )))
        .add_edge("step", "end")
        .set_start("step");

    let out = graph
        .compile()
        .unwrap()
        .run(AgentState::new(), 5)
        .await
        .unwrap();
    assert_eq!(out.slot("finished"), Some(&json!(true)));
}
