//! LLM-call node: one agent turn, including the tool-calling loop and the
//! structured-output correction re-prompt.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::GraphError;
use crate::graph::{Node, NodeKind};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::prompt::{render_tool_list, PromptTemplate};
use crate::schema::{OutputSchema, ParseError};
use crate::state::AgentState;
use crate::tool::{ToolRegistry, ToolSpec};
use crate::trace::{TraceEvent, TraceKind, TraceSink};

/// Default number of tool-call responses tolerated per node step.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

/// One LLM-driven step: prompt, generate, execute requested tools, parse.
///
/// Tool-calling sub-protocol: a tool-call response is not an error; each call
/// is dispatched through the registry and its result (success or structured
/// failure) is appended as a tool-role message, then the same node re-enters
/// generation so the LLM can incorporate it. Bounded by `max_tool_rounds`.
///
/// Structured-output sub-protocol: with an `OutputSchema` set, the final text
/// is parsed; a `ParseError` triggers exactly one correction re-prompt before
/// the step gives up with `GraphError::OutputValidation`.
pub struct LlmNode {
    id: String,
    llm: Arc<dyn LlmClient>,
    registry: Arc<ToolRegistry>,
    tools: Vec<String>,
    output_schema: Option<OutputSchema>,
    system: Option<PromptTemplate>,
    output_slot: String,
    max_tool_rounds: usize,
}

impl LlmNode {
    pub fn new(id: impl Into<String>, llm: Arc<dyn LlmClient>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            id: id.into(),
            llm,
            registry,
            tools: Vec::new(),
            output_schema: None,
            system: None,
            output_slot: "output".to_string(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Exposes the named registry tools to the LLM (builder).
    pub fn with_tools<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tools = names.into_iter().map(Into::into).collect();
        self
    }

    /// Exposes every tool currently in the registry (builder).
    pub fn with_all_tools(mut self) -> Self {
        self.tools = self.registry.names();
        self
    }

    /// Declares the expected structured output shape (builder).
    pub fn with_output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Sets a system prompt template, rendered once per run with bindings from
    /// the state slots plus `{tools}` and `{output_format}` (builder).
    pub fn with_system_template(mut self, template: PromptTemplate) -> Self {
        self.system = Some(template);
        self
    }

    /// Names the slot that receives the parsed structured output (builder).
    pub fn with_output_slot(mut self, slot: impl Into<String>) -> Self {
        self.output_slot = slot.into();
        self
    }

    /// Caps consecutive tool-call responses per step: `n` are tolerated, the
    /// `n+1`st fails with `ToolLoopExceeded` (builder).
    pub fn with_max_tool_rounds(mut self, n: usize) -> Self {
        self.max_tool_rounds = n;
        self
    }

    fn tool_specs(&self) -> Result<Vec<ToolSpec>, GraphError> {
        self.tools
            .iter()
            .map(|name| {
                self.registry
                    .spec(name)
                    .map_err(|e| GraphError::Step(format!("node '{}': {e}", self.id)))
            })
            .collect()
    }

    fn render_system(&self, state: &AgentState, specs: &[ToolSpec]) -> Result<Option<Message>, GraphError> {
        let Some(template) = &self.system else {
            return Ok(None);
        };
        if state.messages.iter().any(|m| matches!(m, Message::System(_))) {
            return Ok(None);
        }
        let mut bindings: HashMap<String, String> = state
            .slots
            .iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect();
        bindings.insert("tools".into(), render_tool_list(specs));
        bindings.insert(
            "output_format".into(),
            self.output_schema
                .as_ref()
                .map(OutputSchema::to_prompt_fragment)
                .unwrap_or_default(),
        );
        let text = template
            .render(&bindings)
            .map_err(|e| GraphError::Step(format!("node '{}': {e}", self.id)))?;
        Ok(Some(Message::system(text)))
    }

    fn correction_message(error: &ParseError, schema: &OutputSchema) -> Message {
        Message::user(format!(
            "The response did not match the required output format: {error}. \
Do not apologize. Respond again with only the corrected output.\n{}",
            schema.to_prompt_fragment()
        ))
    }
}

#[async_trait]
impl Node<AgentState> for LlmNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> NodeKind {
        NodeKind::LlmCall
    }

    async fn run(&self, state: AgentState, trace: &dyn TraceSink) -> Result<AgentState, GraphError> {
        let mut state = state;
        let specs = self.tool_specs()?;
        if let Some(system) = self.render_system(&state, &specs)? {
            state.messages.insert(0, system);
        }
        let tools = (!specs.is_empty()).then_some(specs.as_slice());

        let mut rounds = 0usize;
        let response = loop {
            trace.emit(TraceEvent::now(
                TraceKind::LlmCall,
                &self.id,
                json!({"round": rounds, "messages": state.messages.len()}),
            ));
            let response = self
                .llm
                .generate(&state.messages, tools, self.output_schema.as_ref())
                .await?;
            if response.tool_calls.is_empty() {
                break response;
            }
            if rounds == self.max_tool_rounds {
                return Err(GraphError::ToolLoopExceeded {
                    node: self.id.clone(),
                    limit: self.max_tool_rounds,
                });
            }
            rounds += 1;

            if !response.content.is_empty() {
                state.push(Message::assistant(response.content.clone()));
            }
            for call in &response.tool_calls {
                let result = self
                    .registry
                    .invoke(&call.name, &call.arguments)
                    .with_call_id(call.id.clone());
                trace.emit(TraceEvent::now(
                    TraceKind::ToolInvoked,
                    &self.id,
                    json!({"tool": call.name, "ok": result.outcome.is_ok()}),
                ));
                state.set_slot(
                    "last_tool_result",
                    match &result.outcome {
                        Ok(v) => v.clone(),
                        Err(f) => json!({"error": f.to_string()}),
                    },
                );
                state.push(Message::tool(result.name.clone(), result.content_text()));
            }
        };

        state.push(Message::assistant(response.content.clone()));
        state.set_slot("last_response", Value::String(response.content.clone()));

        if let Some(schema) = &self.output_schema {
            let parsed = match schema.parse(&response.content) {
                Ok(value) => value,
                Err(error) => {
                    // One correction re-prompt describing the failure.
                    state.push(Self::correction_message(&error, schema));
                    let retry = self.llm.generate(&state.messages, None, Some(schema)).await?;
                    state.push(Message::assistant(retry.content.clone()));
                    state.set_slot("last_response", Value::String(retry.content.clone()));
                    schema
                        .parse(&retry.content)
                        .map_err(GraphError::OutputValidation)?
                }
            };
            trace.emit(TraceEvent::now(
                TraceKind::OutputParsed,
                &self.id,
                json!({"slot": self.output_slot}),
            ));
            state.set_slot(&self.output_slot, parsed);
        }

        Ok(state)
    }
}
