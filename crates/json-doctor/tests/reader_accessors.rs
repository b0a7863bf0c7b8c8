//! Integration tests for `ObjectReader` accessor semantics: typed reads,
//! nullable absorption, lists, nested objects and upfront validation.

use json_doctor::{coerce, CoerceError, DecodeError, FailureKind, ObjectReader, TargetKind};
use serde_json::{json, Value};

fn expect_err(
    data: Value,
    read: impl FnOnce(&ObjectReader) -> Result<(), DecodeError>,
) -> DecodeError {
    let reader = ObjectReader::from_value(&data).unwrap_or_else(|e| panic!("fixture: {}", e));
    read(&reader).unwrap_err()
}

// --------------------------------------------------------------- Typed reads

#[test]
fn test_scalar_reads() {
    let data = json!({"name": "Ada", "age": 36, "score": 91.5, "vip": true});
    let reader = ObjectReader::from_value(&data).unwrap();

    assert_eq!(reader.get_string("name").unwrap(), "Ada");
    assert_eq!(reader.get_int("age").unwrap(), 36);
    assert_eq!(reader.get_double("score").unwrap(), 91.5);
    assert_eq!(reader.get_bool("vip").unwrap(), true);
}

#[test]
fn test_numeric_widening_and_narrowing() {
    let data = json!({"count": 99.0, "ratio": 7});
    let reader = ObjectReader::from_value(&data).unwrap();

    assert_eq!(reader.get_int("count").unwrap(), 99);
    assert_eq!(reader.get_double("ratio").unwrap(), 7.0);
}

#[test]
fn test_bool_coercions() {
    let data = json!({"a": 1, "b": 0, "c": "YES", "d": "no", "e": "false"});
    let reader = ObjectReader::from_value(&data).unwrap();

    assert_eq!(reader.get_bool("a").unwrap(), true);
    assert_eq!(reader.get_bool("b").unwrap(), false);
    assert_eq!(reader.get_bool("c").unwrap(), true);
    assert_eq!(reader.get_bool("d").unwrap(), false);
    assert_eq!(reader.get_bool("e").unwrap(), false);
}

#[test]
fn test_bool_rejects_unknown_spelling() {
    let err = expect_err(json!({"flag": "maybe"}), |r| r.get_bool("flag").map(|_| ()));
    assert_eq!(err.kind(), FailureKind::UnparsableFormat);
    assert!(err.report().contains("yes/no"));
}

#[test]
fn test_datetime_reads() {
    let data = json!({
        "iso": "2024-01-15T10:30:00Z",
        "secs": 1_705_314_600,
        "millis": 1_705_314_600_123i64,
    });
    let reader = ObjectReader::from_value(&data).unwrap();

    assert_eq!(reader.get_datetime("iso").unwrap().unix_timestamp(), 1_705_314_600);
    assert_eq!(reader.get_datetime("secs").unwrap().unix_timestamp(), 1_705_314_600);
    let millis = reader.get_datetime("millis").unwrap();
    assert_eq!(millis.unix_timestamp(), 1_705_314_600);
    assert_eq!(millis.millisecond(), 123);
}

#[test]
fn test_datetime_rejects_garbage() {
    let err = expect_err(json!({"when": "next tuesday"}), |r| {
        r.get_datetime("when").map(|_| ())
    });
    assert_eq!(err.kind(), FailureKind::UnparsableFormat);
}

// ------------------------------------------------------------ Null vs missing

#[test]
fn test_null_and_missing_are_distinct_failures() {
    let err = expect_err(json!({"age": null}), |r| r.get_int("age").map(|_| ()));
    assert_eq!(err.kind(), FailureKind::NullValue);

    let err = expect_err(json!({}), |r| r.get_int("age").map(|_| ()));
    assert_eq!(err.kind(), FailureKind::MissingKey);
}

#[test]
fn test_nullable_absorbs_exactly_absent_and_null() {
    let data = json!({"a": null, "b": "x"});
    let reader = ObjectReader::from_value(&data).unwrap();

    assert_eq!(reader.get_nullable_int("a").unwrap(), None);
    assert_eq!(reader.get_nullable_int("missing").unwrap(), None);
    // Any other mismatch still fails.
    let err = reader.get_nullable_int("b").unwrap_err();
    assert_eq!(err.kind(), FailureKind::TypeMismatch);
}

#[test]
fn test_nullable_returns_values_when_present() {
    let data = json!({"a": 5, "b": "hi", "c": true});
    let reader = ObjectReader::from_value(&data).unwrap();

    assert_eq!(reader.get_nullable_int("a").unwrap(), Some(5));
    assert_eq!(reader.get_nullable_string("b").unwrap(), Some("hi".to_string()));
    assert_eq!(reader.get_nullable_bool("c").unwrap(), Some(true));
}

// -------------------------------------------------------------------- Lists

#[test]
fn test_list_reads() {
    let data = json!({"nums": [1, 2, 3], "names": ["a", "b"]});
    let reader = ObjectReader::from_value(&data).unwrap();

    assert_eq!(reader.get_list("nums", coerce::as_int).unwrap(), vec![1, 2, 3]);
    assert_eq!(
        reader.get_list("names", coerce::as_string).unwrap(),
        vec!["a".to_string(), "b".to_string()]
    );
}

#[test]
fn test_list_fails_fast_on_first_bad_item() {
    let err = expect_err(json!({"nums": [1, "bad", 3]}), |r| {
        r.get_list("nums", coerce::as_int).map(|_| ())
    });
    assert_eq!(err.kind(), FailureKind::ListItemMismatch { index: 1 });
    assert!(err.report().contains("index 1"));
    assert!(err.report().contains("\"bad\""));
    assert!(!err.report().contains("index 2"));
}

#[test]
fn test_list_rejects_scalar() {
    let err = expect_err(json!({"nums": "1,2,3"}), |r| {
        r.get_list("nums", coerce::as_int).map(|_| ())
    });
    assert_eq!(err.kind(), FailureKind::NotAList);
}

#[test]
fn test_nullable_list() {
    let data = json!({"a": null, "b": [1]});
    let reader = ObjectReader::from_value(&data).unwrap();

    assert_eq!(reader.get_nullable_list("a", coerce::as_int).unwrap(), None);
    assert_eq!(reader.get_nullable_list("missing", coerce::as_int).unwrap(), None);
    assert_eq!(
        reader.get_nullable_list("b", coerce::as_int).unwrap(),
        Some(vec![1])
    );
}

// ----------------------------------------------------------- Nested objects

#[test]
fn test_object_reads() {
    let data = json!({"address": {"city": "Paris", "zip": "75001"}});
    let reader = ObjectReader::from_value(&data).unwrap();

    let city = reader
        .get_object("address", |addr| addr.get_string("city"))
        .unwrap();
    assert_eq!(city, "Paris");
}

#[test]
fn test_object_rejects_scalar() {
    let err = expect_err(json!({"address": "Paris"}), |r| {
        r.get_object("address", |a| a.get_string("city")).map(|_| ())
    });
    assert_eq!(err.kind(), FailureKind::NotAnObject);
}

#[test]
fn test_nested_failure_names_inner_field() {
    let err = expect_err(json!({"address": {"city": 42}}), |r| {
        r.get_object("address", |a| a.get_string("city")).map(|_| ())
    });
    assert_eq!(err.kind(), FailureKind::TypeMismatch);
    assert!(err.report().contains("'city'"));
}

#[test]
fn test_object_list_reads() {
    let data = json!({"points": [{"x": 1}, {"x": 2}]});
    let reader = ObjectReader::from_value(&data).unwrap();

    let xs = reader
        .get_object_list("points", |p| p.get_int("x"))
        .unwrap();
    assert_eq!(xs, vec![1, 2]);
}

#[test]
fn test_object_list_rejects_scalar_item() {
    let err = expect_err(json!({"points": [{"x": 1}, 7]}), |r| {
        r.get_object_list("points", |p| p.get_int("x")).map(|_| ())
    });
    assert_eq!(err.kind(), FailureKind::ListItemMismatch { index: 1 });
}

#[test]
fn test_nullable_object() {
    let data = json!({"a": null});
    let reader = ObjectReader::from_value(&data).unwrap();

    let read = reader.get_nullable_object("a", |o| o.get_int("x")).unwrap();
    assert_eq!(read, None);
    let read = reader.get_nullable_object("missing", |o| o.get_int("x")).unwrap();
    assert_eq!(read, None);
}

#[test]
fn test_from_value_rejects_non_objects() {
    let err = ObjectReader::from_value(&json!([1, 2])).unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotAnObject);

    let err = ObjectReader::from_value(&json!("text")).unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotAnObject);
}

// ------------------------------------------------------- Custom converters

#[test]
fn test_generic_get_with_custom_converter() {
    let data = json!({"level": "warn"});
    let reader = ObjectReader::from_value(&data).unwrap();

    let level = reader
        .get("level", |v| match v.as_str() {
            Some("info") => Ok(1),
            Some("warn") => Ok(2),
            Some("error") => Ok(3),
            _ => Err(CoerceError::BadFormat(
                "not a known level".to_string(),
            )),
        })
        .unwrap();
    assert_eq!(level, 2);
}

#[test]
fn test_generic_get_custom_converter_failure() {
    let err = expect_err(json!({"level": "loud"}), |r| {
        r.get("level", |v| match v.as_str() {
            Some("info") => Ok(1),
            _ => Err(CoerceError::BadFormat(
                "not a known level".to_string(),
            )),
        })
        .map(|_| ())
    });
    assert_eq!(err.kind(), FailureKind::UnparsableFormat);
    assert!(err.report().contains("not a known level"));
}

#[test]
fn test_generic_read_failure_labels_the_target_type() {
    let err = expect_err(json!({"port": "eighty"}), |r| {
        r.get("port", |v| match v.as_i64() {
            Some(n) => Ok(n as u16),
            None => Err(CoerceError::WrongKind("not a port number".to_string())),
        })
        .map(|_| ())
    });

    assert_eq!(err.kind(), FailureKind::TypeMismatch);
    let ctx = err.context().expect("field context");
    assert_eq!(ctx.target_kind, TargetKind::Other);
    assert_eq!(ctx.target_label, "a value of type u16");
    assert!(err.report().contains("a value of type u16"));
}

// ------------------------------------------------- Validation and introspection

#[test]
fn test_require_keys_passes_when_all_present() {
    let data = json!({"id": 1, "name": "x"});
    let reader = ObjectReader::from_value(&data).unwrap();
    assert!(reader.require_keys(&["id", "name"]).is_ok());
}

#[test]
fn test_require_keys_reports_all_missing_at_once() {
    let err = expect_err(json!({"id": 1}), |r| r.require_keys(&["id", "email", "phone"]));
    assert_eq!(err.kind(), FailureKind::MissingKey);
    assert!(err.report().contains("'email'"));
    assert!(err.report().contains("'phone'"));
    assert!(err.report().contains("'id'"));
    assert!(err.report().contains("2 required keys are missing"));
}

#[test]
fn test_introspection_helpers() {
    let data = json!({"a": 1, "b": 2});
    let reader = ObjectReader::from_value(&data).unwrap();

    assert_eq!(reader.len(), 2);
    assert!(!reader.is_empty());
    assert!(reader.contains_key("a"));
    assert!(!reader.contains_key("z"));
    assert_eq!(reader.keys().collect::<Vec<_>>(), vec!["a", "b"]);
}
