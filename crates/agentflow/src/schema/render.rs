//! Rendering: schema to prompt fragment, value to conforming output text.

use serde_json::Value;

use super::types::OutputSchema;

impl OutputSchema {
    /// Renders an instruction fragment demanding output in this schema's shape.
    ///
    /// The demanded format is a single fenced ```json block; `parse` is the
    /// counterpart that locates and decodes it.
    pub fn to_prompt_fragment(&self) -> String {
        let schema = serde_json::to_string_pretty(&self.to_json_schema())
            .unwrap_or_else(|_| "{}".to_string());
        format!(
            "Your response MUST contain exactly one fenced ```json block with a single \
JSON object matching this schema:\n{schema}\n\
Use literal values only: numbers as numbers (not strings), booleans as true/false, \
no expressions. Violating the format will cause errors."
        )
    }

    /// Renders a conforming value as the fenced block `parse` expects.
    ///
    /// Round-trip property: `parse(render_value(v)) == v` for values that
    /// conform to the schema.
    pub fn render_value(&self, value: &Value) -> String {
        let body = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
        format!("```json\n{body}\n```")
    }
}
