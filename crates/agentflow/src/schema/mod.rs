//! Structured-output engine: declared shapes, prompt fragments, tolerant parsing.
//!
//! - `SemanticType` / `FieldSpec` / `OutputSchema`: the declared shape
//! - `OutputSchema::to_prompt_fragment`: instruction text for the LLM
//! - `OutputSchema::parse`: locate the JSON block in prose, decode, coerce
//! - `ParseError`: the only failure channel; this module never panics
//!
//! One JSON encoding serves both tool-call arguments and structured output:
//! the same `SemanticType` set describes tool parameters (`ParamSpec`) and
//! output fields.

mod parse;
mod render;
mod types;

pub use parse::extract_json_block;
pub use types::{FieldSpec, OutputSchema, ParseError, SemanticType};
