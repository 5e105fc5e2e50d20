//! Tolerant structured-output parsing: locate, decode, coerce.

use serde_json::{Map, Value};

use super::types::{OutputSchema, ParseError, SemanticType};

/// Locates the structured block inside a possibly prose-wrapped response.
///
/// Preference order: a fenced ```json block, any fenced block, then the first
/// balanced `{...}` object. Returns the inner text without the fences.
pub fn extract_json_block(text: &str) -> Option<&str> {
    for marker in ["```json", "```"] {
        if let Some(start) = text.find(marker) {
            let body = &text[start + marker.len()..];
            if let Some(end) = body.find("```") {
                return Some(body[..end].trim());
            }
        }
    }
    first_balanced_object(text)
}

/// Scans for the first `{...}` with balanced braces, skipping braces inside
/// JSON strings.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

impl OutputSchema {
    /// Parses a raw LLM response against this schema.
    ///
    /// Locates the JSON block, decodes it, then coerces each declared field to
    /// its semantic type, recursing into nested schemas. Missing optional
    /// fields take their default (or null); missing required fields, coercion
    /// failures, and undecodable blocks map to the `ParseError` variants.
    /// Undeclared fields in the response are dropped.
    pub fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let block = extract_json_block(raw)
            .ok_or_else(|| ParseError::MalformedOutput("no JSON object found".into()))?;
        let decoded: Value = serde_json::from_str(block)
            .map_err(|e| ParseError::MalformedOutput(e.to_string()))?;
        let Value::Object(obj) = decoded else {
            return Err(ParseError::MalformedOutput(format!(
                "expected a JSON object, found {}",
                kind_of(&decoded)
            )));
        };
        self.coerce_object(&obj)
    }

    fn coerce_object(&self, obj: &Map<String, Value>) -> Result<Value, ParseError> {
        let mut out = Map::new();
        for f in self.fields() {
            match obj.get(&f.name) {
                Some(v) => {
                    out.insert(f.name.clone(), coerce(&f.name, &f.ty, v)?);
                }
                None if f.required => return Err(ParseError::MissingField(f.name.clone())),
                None => {
                    out.insert(f.name.clone(), f.default.clone().unwrap_or(Value::Null));
                }
            }
        }
        Ok(Value::Object(out))
    }
}

/// Coerces one value to its declared semantic type.
fn coerce(field: &str, ty: &SemanticType, value: &Value) -> Result<Value, ParseError> {
    let mismatch = || ParseError::TypeMismatch {
        field: field.to_string(),
        expected: ty.json_name(),
        found: kind_of(value).to_string(),
    };
    match ty {
        SemanticType::String => match value {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(mismatch()),
        },
        SemanticType::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            // Integral floats (e.g. 7.0) are accepted; 7.5 is not.
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 => Ok(Value::from(f as i64)),
                _ => Err(mismatch()),
            },
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        SemanticType::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        SemanticType::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        },
        SemanticType::Array(item) => match value {
            Value::Array(items) => items
                .iter()
                .map(|v| coerce(field, item, v))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            _ => Err(mismatch()),
        },
        SemanticType::Object(schema) => match value {
            Value::Object(obj) => schema.coerce_object(obj),
            _ => Err(mismatch()),
        },
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
