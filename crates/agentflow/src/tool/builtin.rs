//! Builtin tools: Calculator.
//!
//! `CalculatorTool`: safe arithmetic expression evaluation, parameter
//! `expression: string`, backed by `evalexpr`.

use evalexpr::eval;
use serde_json::{Map, Value};

use super::{ParamSpec, Tool};
use crate::error::ToolFailure;
use crate::schema::SemanticType;

/// Evaluates an arithmetic expression string and returns the result.
#[derive(Debug)]
pub struct CalculatorTool {
    params: Vec<ParamSpec>,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self {
            params: vec![ParamSpec::required("expression", SemanticType::String)
                .with_description("Arithmetic expression to evaluate, e.g. 3+5")],
        }
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluates a mathematical expression and returns the result. Example: 3+5, 2*10."
    }

    fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    fn execute(&self, args: &Map<String, Value>) -> Result<Value, ToolFailure> {
        let expr = args
            .get("expression")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if expr.is_empty() {
            return Err(ToolFailure::InvalidArguments(
                "expression must be non-empty".into(),
            ));
        }
        let result = eval(expr).map_err(|e| ToolFailure::Execution(e.to_string()))?;
        if let Ok(i) = result.as_int() {
            Ok(Value::from(i))
        } else if let Ok(f) = result.as_float() {
            Ok(Value::from(f))
        } else {
            Ok(Value::String(result.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(expr: &str) -> Map<String, Value> {
        serde_json::json!({"expression": expr})
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn calculator_3_plus_5() {
        let out = CalculatorTool::new().execute(&args("3+5")).unwrap();
        assert_eq!(out, Value::from(8));
    }

    #[test]
    fn calculator_float() {
        let out = CalculatorTool::new().execute(&args("1.0 + 2 * 3")).unwrap();
        assert_eq!(out, Value::from(7.0));
    }

    #[test]
    fn calculator_invalid_expression() {
        let err = CalculatorTool::new().execute(&args("1 + ")).unwrap_err();
        assert!(matches!(err, ToolFailure::Execution(_)));
    }

    #[test]
    fn calculator_empty_expression() {
        let err = CalculatorTool::new().execute(&args("  ")).unwrap_err();
        assert!(matches!(err, ToolFailure::InvalidArguments(_)));
    }
}
