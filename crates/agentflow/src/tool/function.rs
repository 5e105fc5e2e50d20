//! FunctionTool: a closure with an explicitly declared parameter schema.
//!
//! Replaces reflection-based inference with an explicit registration step:
//! the builder declares each parameter's semantic type from the closed
//! `SemanticType` set, and malformed declarations fail at build time with
//! `RegistryError::SchemaInference`, not at call time.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::{ParamSpec, Tool};
use crate::error::{RegistryError, ToolFailure};

type Handler = Arc<dyn Fn(&Map<String, Value>) -> Result<Value, ToolFailure> + Send + Sync>;

/// A plain function exposed as a schema-described tool.
pub struct FunctionTool {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    handler: Handler,
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl FunctionTool {
    /// Starts declaring a tool with the given name.
    pub fn builder(name: impl Into<String>) -> FunctionToolBuilder {
        FunctionToolBuilder {
            name: name.into(),
            description: String::new(),
            params: Vec::new(),
            handler: None,
        }
    }
}

impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    fn execute(&self, args: &Map<String, Value>) -> Result<Value, ToolFailure> {
        (self.handler)(args)
    }
}

/// Builder for `FunctionTool`; `build` performs the schema checks.
pub struct FunctionToolBuilder {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    handler: Option<Handler>,
}

impl FunctionToolBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declares one parameter.
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the underlying callable. Errors it returns become
    /// `ToolFailure::Execution` results; it must not panic.
    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Result<Value, ToolFailure> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(f));
        self
    }

    /// Validates the declaration and produces the tool.
    ///
    /// Fails with `RegistryError::SchemaInference` for an empty tool name,
    /// an empty or duplicate parameter name, or a missing handler.
    pub fn build(self) -> Result<FunctionTool, RegistryError> {
        let infer_err = |reason: &str| RegistryError::SchemaInference {
            tool: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(infer_err("tool name must be non-empty"));
        }
        for (i, p) in self.params.iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(infer_err("parameter name must be non-empty"));
            }
            if self.params[..i].iter().any(|q| q.name == p.name) {
                return Err(RegistryError::SchemaInference {
                    tool: self.name.clone(),
                    reason: format!("duplicate parameter name: {}", p.name),
                });
            }
        }
        let handler = self.handler.ok_or_else(|| infer_err("missing handler"))?;
        Ok(FunctionTool {
            name: self.name,
            description: self.description,
            params: self.params,
            handler,
        })
    }
}
