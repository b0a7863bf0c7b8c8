//! Human-readable descriptions of JSON values and requested types.

use serde_json::Value;

/// Maximum rendered length of a raw value inside a report.
const PREVIEW_LIMIT: usize = 120;

/// The type a decode call asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Int,
    Double,
    Bool,
    Str,
    DateTime,
    List,
    Object,
    /// A caller-defined type read through a custom converter.
    Other,
}

impl TargetKind {
    /// Description of the requested type, with an example where one helps.
    pub fn label(self) -> &'static str {
        match self {
            TargetKind::Int => "a whole number (like 42)",
            TargetKind::Double => "a decimal number (like 3.14)",
            TargetKind::Bool => "true or false",
            TargetKind::Str => "text (like 'hello')",
            TargetKind::DateTime => "a date/time (like '2024-01-15T10:30:00Z')",
            TargetKind::List => "a list of items",
            TargetKind::Object => "a nested object",
            TargetKind::Other => "a value of the requested type",
        }
    }
}

/// Short type name of a JSON value, as used in structure summaries.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "double"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Description of what a JSON value actually is, in the same register as
/// [`TargetKind::label`].
pub fn actual_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null (no value)",
        Value::Bool(_) => "true or false (a boolean)",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "a whole number"
            } else {
                "a decimal number"
            }
        }
        Value::String(_) => "text",
        Value::Array(_) => "a list of items",
        Value::Object(_) => "a nested object",
    }
}

/// Compact JSON rendering of a value for report output.
///
/// Long values are cut off so a single oversized blob cannot drown the rest
/// of the report.
pub fn value_preview(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= PREVIEW_LIMIT {
        return rendered;
    }
    let cut: String = rendered.chars().take(PREVIEW_LIMIT - 3).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_labels() {
        assert_eq!(TargetKind::Int.label(), "a whole number (like 42)");
        assert_eq!(TargetKind::Str.label(), "text (like 'hello')");
        assert_eq!(TargetKind::Bool.label(), "true or false");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!(true)), "bool");
        assert_eq!(type_name(&json!(42)), "int");
        assert_eq!(type_name(&json!(3.5)), "double");
        assert_eq!(type_name(&json!("x")), "string");
        assert_eq!(type_name(&json!([1])), "list");
        assert_eq!(type_name(&json!({})), "object");
    }

    #[test]
    fn test_actual_label_numbers() {
        assert_eq!(actual_label(&json!(7)), "a whole number");
        assert_eq!(actual_label(&json!(7.25)), "a decimal number");
    }

    #[test]
    fn test_value_preview_short() {
        assert_eq!(value_preview(&json!("hi")), "\"hi\"");
        assert_eq!(value_preview(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_value_preview_truncates() {
        let long = "x".repeat(500);
        let preview = value_preview(&json!(long));
        assert!(preview.chars().count() <= 120);
        assert!(preview.ends_with("..."));
    }
}
