//! Prompt templates: pure, parameterized string building.
//!
//! `PromptTemplate` substitutes `{name}` placeholders from a bindings map;
//! `{{` and `}}` escape literal braces. No control flow lives in templates,
//! so the same bindings always produce the same text. Tool-schema and history
//! fragments are built by the free helpers below and passed in as bindings.

use std::collections::HashMap;

use crate::error::TemplateError;
use crate::message::Message;
use crate::tool::ToolSpec;

/// Named-placeholder template with optional per-placeholder defaults.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
    defaults: HashMap<String, String>,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            defaults: HashMap::new(),
        }
    }

    /// Sets a fallback value used when `render` finds no binding (builder).
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Substitutes placeholders from `bindings`, falling back to defaults.
    ///
    /// A placeholder with neither a binding nor a default fails with
    /// `TemplateError::MissingBinding`. Unmatched single braces are literal.
    pub fn render(&self, bindings: &HashMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.text.len());
        let mut chars = self.text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, n)| n == '{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, n)| n == '}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let rest = &self.text[i + 1..];
                    match rest.find('}') {
                        Some(end) if is_placeholder_name(&rest[..end]) => {
                            let name = &rest[..end];
                            let value = bindings
                                .get(name)
                                .or_else(|| self.defaults.get(name))
                                .ok_or_else(|| TemplateError::MissingBinding(name.to_string()))?;
                            out.push_str(value);
                            for _ in 0..=end {
                                chars.next();
                            }
                        }
                        _ => out.push('{'),
                    }
                }
                _ => out.push(c),
            }
        }
        Ok(out)
    }
}

fn is_placeholder_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Formats tool names, descriptions, and argument schemas for a prompt.
///
/// One entry per tool, sorted by name so the fragment is stable across runs.
pub fn render_tool_list(specs: &[ToolSpec]) -> String {
    if specs.is_empty() {
        return "You CANNOT use any tools in this task.".to_string();
    }
    let mut entries: Vec<String> = specs
        .iter()
        .map(|s| {
            format!(
                "- {}: {}\n  arguments: {}",
                s.name,
                s.description,
                s.parameters_schema()
            )
        })
        .collect();
    entries.sort();
    format!(
        "You have access to the following tools:\n{}\n\
Use tools only when necessary, one action at a time, and follow the exact \
argument types from each schema (numbers as numbers, booleans as true/false, \
literal values only).",
        entries.join("\n")
    )
}

/// Formats conversation history as `[role] content` lines.
pub fn render_history(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| match m {
            Message::Tool { name, content } => format!("[tool:{name}] {content}"),
            other => format!("[{}] {}", other.role(), other.content()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
