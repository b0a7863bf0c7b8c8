//! Conversion choke points.
//!
//! Every typed read funnels through one of the guards here, so failure
//! classification and report assembly happen in exactly one place.

use log::{debug, trace};
use serde_json::{Map, Value};

use crate::coerce::CoerceError;
use crate::context::{FailureKind, FieldContext};
use crate::describe::{type_name, TargetKind};
use crate::diagnose;
use crate::error::DecodeError;

/// Builds the error for an already-classified failure.
pub(crate) fn failure(ctx: FieldContext, kind: FailureKind, cause: Option<&str>) -> DecodeError {
    let report = diagnose::field_report(&ctx, kind, cause);
    debug!("field '{}' failed to decode: {}", ctx.key, kind.name());
    DecodeError::new(kind, report, Some(ctx))
}

/// Runs a conversion; a [`CoerceError`] becomes a classified decode error
/// with a full report.
pub fn guard<T, F>(
    key: &str,
    raw: &Value,
    target: TargetKind,
    label: &str,
    convert: F,
) -> Result<T, DecodeError>
where
    F: FnOnce(&Value) -> Result<T, CoerceError>,
{
    trace!("decoding field '{}' as {}", key, label);
    match convert(raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            let kind = classify(&err);
            let ctx = FieldContext::with_label(key, raw, target, label);
            Err(failure(ctx, kind, Some(&err.to_string())))
        }
    }
}

/// Like [`guard`], but a JSON null is rejected up front with its own
/// dedicated report instead of being handed to the converter.
pub fn guard_not_null<T, F>(
    key: &str,
    raw: &Value,
    target: TargetKind,
    label: &str,
    convert: F,
) -> Result<T, DecodeError>
where
    F: FnOnce(&Value) -> Result<T, CoerceError>,
{
    if raw.is_null() {
        let ctx = FieldContext::with_label(key, &Value::Null, target, label);
        return Err(failure(ctx, FailureKind::NullValue, None));
    }
    guard(key, raw, target, label, convert)
}

/// Converts every element of a list. The first failing item aborts the read
/// with a report naming the index; later items are not inspected.
pub fn guard_list<T, F>(
    key: &str,
    raw: &Value,
    item_target: TargetKind,
    item_label: &str,
    convert: F,
) -> Result<Vec<T>, DecodeError>
where
    F: Fn(&Value) -> Result<T, CoerceError>,
{
    let items = match raw.as_array() {
        Some(items) => items,
        None => return Err(not_a_list(key, raw)),
    };
    trace!("decoding field '{}' as a list of {} items", key, items.len());
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match convert(item) {
            Ok(value) => out.push(value),
            Err(err) => {
                return Err(list_item_failure(
                    key,
                    raw,
                    index,
                    item_target,
                    item_label,
                    Some(&err.to_string()),
                ))
            }
        }
    }
    Ok(out)
}

/// Borrows the value as an object, or fails with a NOT_AN_OBJECT report.
pub(crate) fn guard_object<'v>(
    key: &str,
    raw: &'v Value,
) -> Result<&'v Map<String, Value>, DecodeError> {
    match raw.as_object() {
        Some(object) => Ok(object),
        None => {
            let ctx = FieldContext::new(key, raw, TargetKind::Object);
            let cause = format!("{} is not an object", type_name(raw));
            Err(failure(ctx, FailureKind::NotAnObject, Some(&cause)))
        }
    }
}

pub(crate) fn not_a_list(key: &str, raw: &Value) -> DecodeError {
    let ctx = FieldContext::new(key, raw, TargetKind::List);
    let cause = format!("{} is not a list", type_name(raw));
    failure(ctx, FailureKind::NotAList, Some(&cause))
}

pub(crate) fn list_item_failure(
    key: &str,
    list: &Value,
    index: usize,
    item_target: TargetKind,
    item_label: &str,
    cause: Option<&str>,
) -> DecodeError {
    let ctx = FieldContext::with_label(key, list, item_target, item_label);
    failure(ctx, FailureKind::ListItemMismatch { index }, cause)
}

fn classify(err: &CoerceError) -> FailureKind {
    match err {
        CoerceError::WrongKind(_) => FailureKind::TypeMismatch,
        CoerceError::BadFormat(_) => FailureKind::UnparsableFormat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce;
    use serde_json::json;

    #[test]
    fn test_guard_passes_values_through() {
        let value = guard("n", &json!(7), TargetKind::Int, TargetKind::Int.label(), coerce::as_int);
        assert_eq!(value.unwrap(), 7);
    }

    #[test]
    fn test_guard_classifies_wrong_kind() {
        let err = guard("n", &json!("x"), TargetKind::Int, TargetKind::Int.label(), coerce::as_int)
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::TypeMismatch);
    }

    #[test]
    fn test_guard_classifies_bad_format() {
        let err = guard(
            "flag",
            &json!("maybe"),
            TargetKind::Bool,
            TargetKind::Bool.label(),
            coerce::as_bool,
        )
        .unwrap_err();
        assert_eq!(err.kind(), FailureKind::UnparsableFormat);
    }

    #[test]
    fn test_guard_not_null_rejects_null() {
        let err = guard_not_null(
            "n",
            &json!(null),
            TargetKind::Int,
            TargetKind::Int.label(),
            coerce::as_int,
        )
        .unwrap_err();
        assert_eq!(err.kind(), FailureKind::NullValue);
    }

    #[test]
    fn test_guard_list_fails_fast() {
        let err = guard_list(
            "nums",
            &json!([1, "bad", 3]),
            TargetKind::Int,
            TargetKind::Int.label(),
            coerce::as_int,
        )
        .unwrap_err();
        assert_eq!(err.kind(), FailureKind::ListItemMismatch { index: 1 });
    }

    #[test]
    fn test_guard_list_rejects_non_list() {
        let err = guard_list(
            "nums",
            &json!("oops"),
            TargetKind::Int,
            TargetKind::Int.label(),
            coerce::as_int,
        )
        .unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotAList);
    }
}
