//! Tool registry: name-unique registration, lookup, and total invocation.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::{validate_args, Tool, ToolResult, ToolSpec};
use crate::error::{RegistryError, ToolFailure};

/// Registry of schema-described tools, keyed by unique name.
///
/// Populated at construction time, then shared read-only (e.g. behind `Arc`)
/// across concurrent runs. `invoke` holds no lock across the underlying call;
/// invocations are independent of each other.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool and returns its schema view.
    ///
    /// Shadowing an existing name is a registration error, not a replace.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<ToolSpec, RegistryError> {
        self.register_arc(Arc::new(tool))
    }

    /// Registers an already-shared tool.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<ToolSpec, RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        let spec = ToolSpec::of(tool.as_ref());
        self.tools.insert(name, tool);
        Ok(spec)
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>, RegistryError> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))
    }

    /// Schema view of one registered tool.
    pub fn spec(&self, name: &str) -> Result<ToolSpec, RegistryError> {
        self.get(name).map(|t| ToolSpec::of(t.as_ref()))
    }

    /// Schema views of all registered tools, sorted by name.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| ToolSpec::of(t.as_ref())).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Invokes a tool by name; always returns a `ToolResult`, never raises.
    ///
    /// Unknown name, non-object or invalid arguments, and executable failures
    /// all become in-band `ToolFailure`s inside the result, so the graph can
    /// feed them back to the LLM for self-correction.
    pub fn invoke(&self, name: &str, args: &Value) -> ToolResult {
        let Some(tool) = self.tools.get(name).cloned() else {
            return ToolResult::failed(name, ToolFailure::UnknownTool(name.to_string()));
        };
        let empty = serde_json::Map::new();
        let args = match args {
            Value::Object(obj) => obj,
            Value::Null => &empty,
            _ => {
                return ToolResult::failed(
                    name,
                    ToolFailure::InvalidArguments("arguments must be a JSON object".into()),
                )
            }
        };
        if let Err(msg) = validate_args(tool.params(), args) {
            return ToolResult::failed(name, ToolFailure::InvalidArguments(msg));
        }
        match tool.execute(args) {
            Ok(value) => ToolResult::ok(name, value),
            Err(failure) => ToolResult::failed(name, failure),
        }
    }
}
