//! The library error type: a classified decode failure carrying its full
//! diagnostic report.

use thiserror::Error;

use crate::context::{FailureKind, FieldContext};

/// A failed decode.
///
/// `Display` is the complete multi-section diagnostic report; presentation
/// layers print it verbatim. [`DecodeError::kind`] and
/// [`DecodeError::context`] expose the structured side for callers that want
/// to branch instead of print.
#[derive(Error, Debug, Clone)]
#[error("{report}")]
pub struct DecodeError {
    kind: FailureKind,
    report: String,
    context: Option<FieldContext>,
}

impl DecodeError {
    pub(crate) fn new(kind: FailureKind, report: String, context: Option<FieldContext>) -> Self {
        DecodeError {
            kind,
            report,
            context,
        }
    }

    /// The failure classification.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// The full diagnostic report, same text as `Display`.
    pub fn report(&self) -> &str {
        &self.report
    }

    /// Context captured at the failing call site. `None` for object-level
    /// failures such as a missing-keys batch check.
    pub fn context(&self) -> Option<&FieldContext> {
        self.context.as_ref()
    }
}
