//! Lenient conversions from raw JSON values to target types.
//!
//! Converters report failures as [`CoerceError`]; the guard layer turns those
//! into classified decode errors with full reports.

use serde_json::Value;
use thiserror::Error;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::describe::type_name;

/// Integer timestamps at or above this magnitude are read as milliseconds,
/// below it as seconds.
pub const UNIX_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// String spellings accepted as `true` (case-insensitive).
pub const TRUE_WORDS: [&str; 3] = ["true", "1", "yes"];

/// String spellings accepted as `false` (case-insensitive).
pub const FALSE_WORDS: [&str; 3] = ["false", "0", "no"];

/// Why a single conversion failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoerceError {
    /// The JSON type itself rules the conversion out.
    #[error("{0}")]
    WrongKind(String),
    /// The JSON type is acceptable but the content cannot be interpreted.
    #[error("{0}")]
    BadFormat(String),
}

// --------------------------------------------------------------- Scalar reads

/// Reads a whole number. Accepts any JSON number; fractional values truncate
/// toward zero.
pub fn as_int(value: &Value) -> Result<i64, CoerceError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if let Some(u) = n.as_u64() {
                return i64::try_from(u).map_err(|_| {
                    CoerceError::WrongKind(format!(
                        "{} does not fit in a 64-bit signed integer",
                        u
                    ))
                });
            }
            match n.as_f64() {
                Some(f) if f.is_finite() => Ok(f.trunc() as i64),
                _ => Err(CoerceError::WrongKind(
                    "number is not representable as an integer".to_string(),
                )),
            }
        }
        other => Err(CoerceError::WrongKind(format!(
            "{} is not a number",
            type_name(other)
        ))),
    }
}

/// Reads a floating-point number. Accepts any JSON number.
pub fn as_double(value: &Value) -> Result<f64, CoerceError> {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) => Ok(f),
            None => Err(CoerceError::WrongKind(
                "number is not representable as a double".to_string(),
            )),
        },
        other => Err(CoerceError::WrongKind(format!(
            "{} is not a number",
            type_name(other)
        ))),
    }
}

/// Reads a string. No coercion from other types; formatting a number or
/// boolean as text is left to the caller.
pub fn as_string(value: &Value) -> Result<String, CoerceError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(CoerceError::WrongKind(format!(
            "{} is not text",
            type_name(other)
        ))),
    }
}

/// Reads a boolean leniently: literal booleans, whole numbers
/// (zero/nonzero), and the spellings in [`TRUE_WORDS`]/[`FALSE_WORDS`].
pub fn as_bool(value: &Value) -> Result<bool, CoerceError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i != 0);
            }
            if let Some(u) = n.as_u64() {
                return Ok(u != 0);
            }
            Err(CoerceError::BadFormat(
                "only whole numbers can stand for true or false".to_string(),
            ))
        }
        Value::String(s) => {
            let lower = s.trim().to_lowercase();
            if TRUE_WORDS.contains(&lower.as_str()) {
                return Ok(true);
            }
            if FALSE_WORDS.contains(&lower.as_str()) {
                return Ok(false);
            }
            Err(CoerceError::BadFormat(format!(
                "'{}' does not spell a boolean (accepted: true/false, 1/0, yes/no)",
                s
            )))
        }
        other => Err(CoerceError::WrongKind(format!(
            "{} is not a boolean",
            type_name(other)
        ))),
    }
}

// ------------------------------------------------------------- Date and time

/// Reads a date/time from ISO-8601 text or a Unix timestamp.
///
/// Integer timestamps are interpreted as milliseconds at or above
/// [`UNIX_MILLIS_THRESHOLD`], as seconds below it. Text without an offset is
/// assumed to be UTC.
pub fn as_datetime(value: &Value) -> Result<OffsetDateTime, CoerceError> {
    match value {
        Value::String(s) => datetime_from_text(s),
        Value::Number(n) => datetime_from_number(n),
        other => Err(CoerceError::WrongKind(format!(
            "{} is not a date/time",
            type_name(other)
        ))),
    }
}

fn datetime_from_text(s: &str) -> Result<OffsetDateTime, CoerceError> {
    let s = s.trim();
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(dt);
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Iso8601::DEFAULT) {
        return Ok(dt);
    }
    if let Ok(dt) = PrimitiveDateTime::parse(s, &Iso8601::DEFAULT) {
        return Ok(dt.assume_utc());
    }
    if let Ok(d) = Date::parse(s, &Iso8601::DEFAULT) {
        return Ok(d.midnight().assume_utc());
    }
    Err(CoerceError::BadFormat(format!(
        "'{}' is not ISO-8601 date/time text",
        s
    )))
}

fn datetime_from_number(n: &serde_json::Number) -> Result<OffsetDateTime, CoerceError> {
    let ts = match integral_i64(n) {
        Some(ts) => ts,
        None => {
            return Err(CoerceError::BadFormat(
                "a Unix timestamp must be a whole number of seconds or milliseconds".to_string(),
            ))
        }
    };
    if ts.unsigned_abs() >= UNIX_MILLIS_THRESHOLD as u64 {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(ts) * 1_000_000).map_err(|_| {
            CoerceError::BadFormat(format!(
                "{} is out of range for a millisecond Unix timestamp",
                ts
            ))
        })
    } else {
        OffsetDateTime::from_unix_timestamp(ts).map_err(|_| {
            CoerceError::BadFormat(format!("{} is out of range for a second Unix timestamp", ts))
        })
    }
}

fn integral_i64(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if let Some(u) = n.as_u64() {
        return i64::try_from(u).ok();
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
