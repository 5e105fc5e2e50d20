//! Argument validation against a declared parameter list.
//!
//! Used by `ToolRegistry::invoke` before calling `Tool::execute`; failures are
//! wrapped in `ToolFailure::InvalidArguments` so they stay in-band.

use serde_json::{Map, Value};

use super::ParamSpec;

/// Validates `args` against the declared parameters.
///
/// Checks: every required parameter is present, every present value matches
/// its declared semantic type (strict, no coercion), and no undeclared keys
/// appear. Returns the first problem as a message the LLM can act on.
pub fn validate_args(params: &[ParamSpec], args: &Map<String, Value>) -> Result<(), String> {
    for p in params {
        match args.get(&p.name) {
            Some(v) => {
                if !p.ty.matches(v) {
                    return Err(format!(
                        "argument '{}' must be of type {}",
                        p.name,
                        p.ty.json_name()
                    ));
                }
            }
            None if p.required => {
                return Err(format!("missing required argument: {}", p.name));
            }
            None => {}
        }
    }
    for key in args.keys() {
        if !params.iter().any(|p| &p.name == key) {
            return Err(format!("unexpected argument: {key}"));
        }
    }
    Ok(())
}
