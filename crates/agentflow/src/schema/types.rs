//! Schema types: semantic types, field specs, output schemas, parse errors.

use serde_json::{json, Value};
use thiserror::Error;

/// Closed set of semantic types a tool parameter or output field may declare.
///
/// Anything outside this set cannot be registered; unsupported types fail
/// loudly at registration time, not at call time.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticType {
    String,
    Integer,
    Number,
    Boolean,
    /// Homogeneous array of the given element type.
    Array(Box<SemanticType>),
    /// Nested object described by its own schema.
    Object(Box<OutputSchema>),
}

impl SemanticType {
    /// JSON-Schema type name for prompt rendering and error messages.
    pub fn json_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Minimal JSON-Schema rendering of this type.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::Array(item) => json!({"type": "array", "items": item.to_json_schema()}),
            Self::Object(schema) => schema.to_json_schema(),
            other => json!({"type": other.json_name()}),
        }
    }

    /// Strict check used for tool-argument validation (no coercion).
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array(item) => value
                .as_array()
                .is_some_and(|a| a.iter().all(|v| item.matches(v))),
            Self::Object(schema) => value.as_object().is_some_and(|obj| {
                schema
                    .fields()
                    .iter()
                    .all(|f| !f.required || obj.contains_key(&f.name))
            }),
        }
    }
}

/// One named field of an output schema or tool parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: SemanticType,
    pub required: bool,
    /// Substituted when an optional field is absent from the parsed output.
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl FieldSpec {
    /// Required field of the given type.
    pub fn required(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            default: None,
            description: None,
        }
    }

    /// Optional field; absent values parse to `Value::Null` unless a default is set.
    pub fn optional(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            default: None,
            description: None,
        }
    }

    /// Sets the default used when the field is missing (builder).
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets a human-readable description for prompt rendering (builder).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Declarative description of an expected structured output.
///
/// Used both to prompt the LLM (`to_prompt_fragment`) and to validate and
/// parse its response (`parse`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputSchema {
    fields: Vec<FieldSpec>,
}

impl OutputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a required field (builder).
    pub fn field(mut self, name: impl Into<String>, ty: SemanticType) -> Self {
        self.fields.push(FieldSpec::required(name, ty));
        self
    }

    /// Appends an optional field (builder).
    pub fn optional_field(mut self, name: impl Into<String>, ty: SemanticType) -> Self {
        self.fields.push(FieldSpec::optional(name, ty));
        self
    }

    /// Appends a pre-built field spec (builder).
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Minimal JSON-Schema object: type, properties, required.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for f in &self.fields {
            let mut prop = f.ty.to_json_schema();
            if let (Some(desc), Some(obj)) = (&f.description, prop.as_object_mut()) {
                obj.insert("description".into(), json!(desc));
            }
            properties.insert(f.name.clone(), prop);
            if f.required {
                required.push(json!(f.name));
            }
        }
        json!({"type": "object", "properties": properties, "required": required})
    }
}

/// Structured-output parse failure.
///
/// Returned as data so the graph can re-prompt with the error instead of
/// crashing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A required field was absent from the decoded object.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A field value could not be coerced to its declared semantic type.
    #[error("type mismatch for field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// No decodable JSON block, or broken container syntax.
    #[error("malformed output: {0}")]
    MalformedOutput(String),
}
