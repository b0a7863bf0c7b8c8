//! Decode-failure classification and per-field context.

use serde_json::Value;

use crate::describe::TargetKind;

/// Classification of a single decode failure.
///
/// Exactly one kind is assigned per failure, and the kind alone decides which
/// report sections are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The requested key is not present in the object.
    MissingKey,
    /// The key is present but its value is JSON null.
    NullValue,
    /// The value's JSON type does not match the requested type.
    TypeMismatch,
    /// An element of a list failed to decode.
    ListItemMismatch { index: usize },
    /// A list was requested but the value is not a JSON array.
    NotAList,
    /// An object was requested but the value is not a JSON object.
    NotAnObject,
    /// The JSON type is acceptable but the content cannot be interpreted.
    UnparsableFormat,
}

impl FailureKind {
    /// Stable machine-readable code.
    pub fn name(self) -> &'static str {
        match self {
            FailureKind::MissingKey => "MISSING_KEY",
            FailureKind::NullValue => "NULL_VALUE",
            FailureKind::TypeMismatch => "TYPE_MISMATCH",
            FailureKind::ListItemMismatch { .. } => "LIST_ITEM_MISMATCH",
            FailureKind::NotAList => "NOT_A_LIST",
            FailureKind::NotAnObject => "NOT_AN_OBJECT",
            FailureKind::UnparsableFormat => "UNPARSABLE_FORMAT",
        }
    }

    /// One-line human-readable statement of the problem.
    pub fn message(self) -> &'static str {
        match self {
            FailureKind::MissingKey => "Key is missing.",
            FailureKind::NullValue => "Required value is null.",
            FailureKind::TypeMismatch => "Value has the wrong type.",
            FailureKind::ListItemMismatch { .. } => "A list item has the wrong type.",
            FailureKind::NotAList => "Value is not a list.",
            FailureKind::NotAnObject => "Value is not an object.",
            FailureKind::UnparsableFormat => "Value cannot be interpreted in the requested format.",
        }
    }
}

/// Context captured at the decode call site, carried on the final error for
/// programmatic inspection.
#[derive(Debug, Clone)]
pub struct FieldContext {
    /// The key that was read.
    pub key: String,
    /// The raw value found under the key. `Null` when the key was absent.
    /// For list failures this is the whole list.
    pub raw: Value,
    /// Description of the requested type.
    pub target_label: String,
    /// The requested type.
    pub target_kind: TargetKind,
}

impl FieldContext {
    pub fn new(key: &str, raw: &Value, target_kind: TargetKind) -> Self {
        FieldContext::with_label(key, raw, target_kind, target_kind.label())
    }

    /// Context with an explicit label describing the requested type. Generic
    /// reads pass [`TargetKind::Other`] and a label derived from the Rust
    /// type name.
    pub fn with_label(key: &str, raw: &Value, target_kind: TargetKind, label: &str) -> Self {
        FieldContext {
            key: key.to_string(),
            raw: raw.clone(),
            target_label: label.to_string(),
            target_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names_are_stable() {
        assert_eq!(FailureKind::MissingKey.name(), "MISSING_KEY");
        assert_eq!(
            FailureKind::ListItemMismatch { index: 3 }.name(),
            "LIST_ITEM_MISMATCH"
        );
        assert_eq!(FailureKind::UnparsableFormat.name(), "UNPARSABLE_FORMAT");
    }

    #[test]
    fn test_context_new_uses_kind_label() {
        let ctx = FieldContext::new("age", &json!("25"), TargetKind::Int);
        assert_eq!(ctx.key, "age");
        assert_eq!(ctx.target_label, "a whole number (like 42)");
        assert_eq!(ctx.target_kind, TargetKind::Int);
    }

    #[test]
    fn test_context_with_label() {
        let ctx =
            FieldContext::with_label("id", &json!(1), TargetKind::Other, "a value of type Uuid");
        assert_eq!(ctx.target_kind, TargetKind::Other);
        assert_eq!(ctx.target_label, "a value of type Uuid");
    }
}
