//! Tools: trait, specs, registry, validation, builtins.
//!
//! - `Tool`: the callable interface (name, description, params, execute)
//! - `FunctionTool`: wraps a closure with explicitly declared parameters
//! - `ToolRegistry`: name-unique registration and total `invoke`
//! - `validate_args`: required-field and semantic-type checks
//! - `ToolFailure`: see `crate::error::ToolFailure`

mod builtin;
mod function;
mod registry;
mod validation;

pub use builtin::CalculatorTool;
pub use function::{FunctionTool, FunctionToolBuilder};
pub use registry::ToolRegistry;
pub use validation::validate_args;

use serde_json::{Map, Value};

use crate::error::ToolFailure;
use crate::schema::SemanticType;

/// One declared tool parameter: name, semantic type, required flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub ty: SemanticType,
    pub required: bool,
    pub description: Option<String>,
}

impl ParamSpec {
    /// Required parameter of the given semantic type.
    pub fn required(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            description: None,
        }
    }

    /// Optional parameter.
    pub fn optional(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            description: None,
        }
    }

    /// Sets a description for prompt rendering (builder).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Tool interface: schema-described callable, invocable by name.
///
/// `execute` receives arguments already validated against `params()`.
/// Failures are returned as `ToolFailure`, never panics.
pub trait Tool: Send + Sync {
    /// Tool name, unique within a registry.
    fn name(&self) -> &str;

    /// Human-readable description for the LLM.
    fn description(&self) -> &str;

    /// Declared parameters, used for validation and prompt rendering.
    fn params(&self) -> &[ParamSpec];

    /// Runs the tool with validated arguments.
    fn execute(&self, args: &Map<String, Value>) -> Result<Value, ToolFailure>;
}

impl std::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Schema-only view of a registered tool.
///
/// Produced by `ToolRegistry::spec`/`specs`; consumed by `render_tool_list`
/// and passed to `LlmClient::generate` as the available-tool set.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

impl ToolSpec {
    /// Captures the schema view of a tool.
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            params: tool.params().to_vec(),
        }
    }

    /// Minimal JSON Schema for the parameter object: type, properties, required.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for p in &self.params {
            let mut prop = p.ty.to_json_schema();
            if let (Some(desc), Some(obj)) = (&p.description, prop.as_object_mut()) {
                obj.insert("description".into(), Value::String(desc.clone()));
            }
            properties.insert(p.name.clone(), prop);
            if p.required {
                required.push(Value::String(p.name.clone()));
            }
        }
        serde_json::json!({"type": "object", "properties": properties, "required": required})
    }
}

/// Outcome of one tool invocation: success value or in-band failure.
///
/// Always a value, never an Err out of the registry, so the graph can append
/// it to the conversation for LLM self-correction.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub name: String,
    pub call_id: Option<String>,
    pub outcome: Result<Value, ToolFailure>,
}

impl ToolResult {
    pub fn ok(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            call_id: None,
            outcome: Ok(value),
        }
    }

    pub fn failed(name: impl Into<String>, failure: ToolFailure) -> Self {
        Self {
            name: name.into(),
            call_id: None,
            outcome: Err(failure),
        }
    }

    /// Attaches the originating call id (builder).
    pub fn with_call_id(mut self, id: Option<String>) -> Self {
        self.call_id = id;
        self
    }

    /// Text form for a tool-role message: plain scalars, JSON for containers,
    /// `ERROR: ...` for failures.
    pub fn content_text(&self) -> String {
        match &self.outcome {
            Ok(Value::String(s)) => s.clone(),
            Ok(v) => v.to_string(),
            Err(f) => format!("ERROR: {f}"),
        }
    }
}
