//! Typed access to a parsed JSON object.

use log::debug;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::coerce::{self, CoerceError};
use crate::context::{FailureKind, FieldContext};
use crate::describe::{type_name, TargetKind};
use crate::diagnose;
use crate::error::DecodeError;
use crate::guard;

/// Read-only view over a parsed JSON object.
///
/// Every accessor either returns a value of the exact requested type or a
/// [`DecodeError`] carrying a full diagnostic report. The nullable variants
/// additionally map "key absent or value null" to `None`; any other mismatch
/// still fails. The wrapped object is never mutated.
///
/// # Examples
///
/// ```
/// use json_doctor::ObjectReader;
/// use serde_json::json;
///
/// let data = json!({"name": "Ada", "age": 36, "vip": "yes"});
/// let reader = ObjectReader::from_value(&data).unwrap();
///
/// assert_eq!(reader.get_string("name").unwrap(), "Ada");
/// assert_eq!(reader.get_int("age").unwrap(), 36);
/// assert_eq!(reader.get_bool("vip").unwrap(), true);
/// assert_eq!(reader.get_nullable_int("score").unwrap(), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectReader<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> ObjectReader<'a> {
    pub fn new(object: &'a Map<String, Value>) -> Self {
        ObjectReader { object }
    }

    /// Wraps the object inside `value`, failing with a report when the
    /// top-level value is anything else.
    pub fn from_value(value: &'a Value) -> Result<Self, DecodeError> {
        match value.as_object() {
            Some(object) => Ok(ObjectReader { object }),
            None => Err(DecodeError::new(
                FailureKind::NotAnObject,
                diagnose::root_not_object_report(value),
                None,
            )),
        }
    }

    // ------------------------------------------------------- Generic reads

    /// Reads `key` through a caller-supplied converter.
    pub fn get<T, F>(&self, key: &str, convert: F) -> Result<T, DecodeError>
    where
        F: FnOnce(&Value) -> Result<T, CoerceError>,
    {
        self.get_as(key, TargetKind::Other, &generic_label::<T>(), convert)
    }

    /// Like [`ObjectReader::get`], but absent keys and null values read as
    /// `None` instead of failing.
    pub fn get_nullable<T, F>(&self, key: &str, convert: F) -> Result<Option<T>, DecodeError>
    where
        F: FnOnce(&Value) -> Result<T, CoerceError>,
    {
        self.get_nullable_as(key, TargetKind::Other, &generic_label::<T>(), convert)
    }

    /// Reads a list, converting every element. The first failing element
    /// aborts the read and names its index in the report.
    pub fn get_list<T, F>(&self, key: &str, convert: F) -> Result<Vec<T>, DecodeError>
    where
        F: Fn(&Value) -> Result<T, CoerceError>,
    {
        self.get_list_as(key, TargetKind::Other, &generic_label::<T>(), convert)
    }

    /// Like [`ObjectReader::get_list`], but absent keys and null values read
    /// as `None`.
    pub fn get_nullable_list<T, F>(
        &self,
        key: &str,
        convert: F,
    ) -> Result<Option<Vec<T>>, DecodeError>
    where
        F: Fn(&Value) -> Result<T, CoerceError>,
    {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => {
                guard::guard_list(key, raw, TargetKind::Other, &generic_label::<T>(), convert)
                    .map(Some)
            }
        }
    }

    /// Reads a nested object by handing a reader for it to `build`.
    pub fn get_object<T, F>(&self, key: &str, build: F) -> Result<T, DecodeError>
    where
        F: FnOnce(&ObjectReader) -> Result<T, DecodeError>,
    {
        match self.object.get(key) {
            None => Err(self.missing(key, TargetKind::Object, TargetKind::Object.label())),
            Some(raw) if raw.is_null() => Err(guard::failure(
                FieldContext::new(key, &Value::Null, TargetKind::Object),
                FailureKind::NullValue,
                None,
            )),
            Some(raw) => {
                let inner = guard::guard_object(key, raw)?;
                build(&ObjectReader::new(inner))
            }
        }
    }

    /// Like [`ObjectReader::get_object`], but absent keys and null values
    /// read as `None`.
    pub fn get_nullable_object<T, F>(&self, key: &str, build: F) -> Result<Option<T>, DecodeError>
    where
        F: FnOnce(&ObjectReader) -> Result<T, DecodeError>,
    {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => {
                let inner = guard::guard_object(key, raw)?;
                build(&ObjectReader::new(inner)).map(Some)
            }
        }
    }

    /// Reads a list of nested objects. A non-object element fails at its
    /// index; a failure inside an element keeps that element's own report.
    pub fn get_object_list<T, F>(&self, key: &str, build: F) -> Result<Vec<T>, DecodeError>
    where
        F: Fn(&ObjectReader) -> Result<T, DecodeError>,
    {
        match self.object.get(key) {
            None => Err(self.missing(key, TargetKind::List, TargetKind::List.label())),
            Some(raw) if raw.is_null() => Err(guard::failure(
                FieldContext::new(key, &Value::Null, TargetKind::List),
                FailureKind::NullValue,
                None,
            )),
            Some(raw) => {
                let items = match raw.as_array() {
                    Some(items) => items,
                    None => return Err(guard::not_a_list(key, raw)),
                };
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let inner = match item.as_object() {
                        Some(inner) => inner,
                        None => {
                            let cause = format!("{} is not an object", type_name(item));
                            return Err(guard::list_item_failure(
                                key,
                                raw,
                                index,
                                TargetKind::Object,
                                TargetKind::Object.label(),
                                Some(&cause),
                            ));
                        }
                    };
                    out.push(build(&ObjectReader::new(inner))?);
                }
                Ok(out)
            }
        }
    }

    // --------------------------------------------------------- Typed reads

    pub fn get_string(&self, key: &str) -> Result<String, DecodeError> {
        self.get_as(key, TargetKind::Str, TargetKind::Str.label(), coerce::as_string)
    }

    /// Reads a whole number. Accepts any JSON number; fractional values
    /// truncate toward zero.
    pub fn get_int(&self, key: &str) -> Result<i64, DecodeError> {
        self.get_as(key, TargetKind::Int, TargetKind::Int.label(), coerce::as_int)
    }

    pub fn get_double(&self, key: &str) -> Result<f64, DecodeError> {
        self.get_as(
            key,
            TargetKind::Double,
            TargetKind::Double.label(),
            coerce::as_double,
        )
    }

    /// Reads a boolean leniently: literal booleans, whole numbers
    /// (zero/nonzero) and the spellings true/false, 1/0, yes/no.
    pub fn get_bool(&self, key: &str) -> Result<bool, DecodeError> {
        self.get_as(key, TargetKind::Bool, TargetKind::Bool.label(), coerce::as_bool)
    }

    /// Reads a date/time from ISO-8601 text or a Unix timestamp in seconds
    /// or milliseconds.
    pub fn get_datetime(&self, key: &str) -> Result<OffsetDateTime, DecodeError> {
        self.get_as(
            key,
            TargetKind::DateTime,
            TargetKind::DateTime.label(),
            coerce::as_datetime,
        )
    }

    pub fn get_nullable_string(&self, key: &str) -> Result<Option<String>, DecodeError> {
        self.get_nullable_as(key, TargetKind::Str, TargetKind::Str.label(), coerce::as_string)
    }

    pub fn get_nullable_int(&self, key: &str) -> Result<Option<i64>, DecodeError> {
        self.get_nullable_as(key, TargetKind::Int, TargetKind::Int.label(), coerce::as_int)
    }

    pub fn get_nullable_double(&self, key: &str) -> Result<Option<f64>, DecodeError> {
        self.get_nullable_as(
            key,
            TargetKind::Double,
            TargetKind::Double.label(),
            coerce::as_double,
        )
    }

    pub fn get_nullable_bool(&self, key: &str) -> Result<Option<bool>, DecodeError> {
        self.get_nullable_as(key, TargetKind::Bool, TargetKind::Bool.label(), coerce::as_bool)
    }

    pub fn get_nullable_datetime(&self, key: &str) -> Result<Option<OffsetDateTime>, DecodeError> {
        self.get_nullable_as(
            key,
            TargetKind::DateTime,
            TargetKind::DateTime.label(),
            coerce::as_datetime,
        )
    }

    // ------------------------------------------------ Validation and introspection

    /// Checks all `keys` up front; any absent ones produce a single batch
    /// report listing them together with the keys that do exist.
    pub fn require_keys(&self, keys: &[&str]) -> Result<(), DecodeError> {
        let missing: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|k| !self.object.contains_key(*k))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        debug!("required keys missing: {:?}", missing);
        let report = diagnose::required_keys_report(&missing, self.object);
        Err(DecodeError::new(FailureKind::MissingKey, report, None))
    }

    /// Pairs every key with the runtime type of its value. Pure
    /// introspection: never fails, same output for the same object.
    pub fn structure_summary(&self) -> String {
        diagnose::structure_summary(self.object)
    }

    /// Compares the object's keys against an expected set and renders
    /// matched, missing and extra keys with exact counts.
    pub fn analyze_property_mapping(&self, expected: &[&str]) -> String {
        diagnose::property_mapping_report(self.object, expected)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.object.keys().map(|k| k.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.object.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.object.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object.is_empty()
    }

    // ------------------------------------------------------------ Internals

    fn get_as<T, F>(
        &self,
        key: &str,
        target: TargetKind,
        label: &str,
        convert: F,
    ) -> Result<T, DecodeError>
    where
        F: FnOnce(&Value) -> Result<T, CoerceError>,
    {
        match self.object.get(key) {
            None => Err(self.missing(key, target, label)),
            Some(raw) => guard::guard_not_null(key, raw, target, label, convert),
        }
    }

    fn get_nullable_as<T, F>(
        &self,
        key: &str,
        target: TargetKind,
        label: &str,
        convert: F,
    ) -> Result<Option<T>, DecodeError>
    where
        F: FnOnce(&Value) -> Result<T, CoerceError>,
    {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => guard::guard(key, raw, target, label, convert).map(Some),
        }
    }

    fn get_list_as<T, F>(
        &self,
        key: &str,
        item_target: TargetKind,
        item_label: &str,
        convert: F,
    ) -> Result<Vec<T>, DecodeError>
    where
        F: Fn(&Value) -> Result<T, CoerceError>,
    {
        match self.object.get(key) {
            None => Err(self.missing(key, TargetKind::List, TargetKind::List.label())),
            Some(raw) if raw.is_null() => Err(guard::failure(
                FieldContext::new(key, &Value::Null, TargetKind::List),
                FailureKind::NullValue,
                None,
            )),
            Some(raw) => guard::guard_list(key, raw, item_target, item_label, convert),
        }
    }

    fn missing(&self, key: &str, target: TargetKind, label: &str) -> DecodeError {
        debug!("field '{}' not found", key);
        let ctx = FieldContext::with_label(key, &Value::Null, target, label);
        let report = diagnose::missing_key_report(&ctx, self.object);
        DecodeError::new(FailureKind::MissingKey, report, Some(ctx))
    }
}

fn generic_label<T>() -> String {
    let full = std::any::type_name::<T>();
    let short = full.rsplit("::").next().unwrap_or(full);
    format!("a value of type {}", short)
}
