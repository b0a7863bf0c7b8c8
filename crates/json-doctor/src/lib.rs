//! Typed JSON field access with detailed decode-failure diagnostics.
//!
//! # Overview
//!
//! This crate wraps a parsed [`serde_json`] object in an [`ObjectReader`]
//! that reads fields as concrete types. When a read cannot succeed, the
//! returned [`DecodeError`] carries a full multi-section report: what
//! failed, expected vs actual, near-miss key suggestions (including naming
//! convention mismatches) and concrete fix steps for the exact type pair
//! involved.
//!
//! # Example
//!
//! ```
//! use json_doctor::ObjectReader;
//! use serde_json::json;
//!
//! let data = json!({"name": "Ada", "age": 36});
//! let reader = ObjectReader::from_value(&data).unwrap();
//!
//! assert_eq!(reader.get_string("name").unwrap(), "Ada");
//! assert_eq!(reader.get_int("age").unwrap(), 36);
//!
//! // A misspelled key fails with a report that names the near miss.
//! let err = reader.get_int("agee").unwrap_err();
//! assert!(err.to_string().contains("'age'"));
//! ```

pub mod coerce;
pub mod context;
pub mod decode;
pub mod describe;
pub mod diagnose;
pub mod error;
pub mod guard;
pub mod reader;
pub mod similar;

// Re-export the core public API
pub use coerce::CoerceError;
pub use context::{FailureKind, FieldContext};
pub use decode::{DecodeFn, DecodeObject, DecoderRegistry};
pub use describe::TargetKind;
pub use diagnose::REPORT_HEADER;
pub use error::DecodeError;
pub use reader::ObjectReader;
